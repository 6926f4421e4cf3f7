mod id;
mod timestamp;

pub use id::{FarmerId, FieldId, HistoryId};
pub use timestamp::Timestamp;
