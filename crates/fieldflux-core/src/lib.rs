//! FieldFlux core runtime: domain model, typed error taxonomy, the
//! transactional field store, and the executors that drive the validated
//! geometry pipeline (normalize, overlap-check, project, commit, record).

pub mod db;
pub mod error;
pub mod model;
pub mod obs;
pub mod types;

pub use error::Error;

///
/// Prelude
///
/// Domain vocabulary only. Executors are reached through [`db::Db`].
///

pub mod prelude {
    pub use crate::{
        db::Db,
        error::Error,
        model::{Farmer, FarmerDraft, FarmerSummary, Field, FieldDraft, HistoryAction, HistoryEntry},
        types::{FarmerId, FieldId, HistoryId, Timestamp},
    };
    pub use fieldflux_geo::{Boundary, GeometryError};
}
