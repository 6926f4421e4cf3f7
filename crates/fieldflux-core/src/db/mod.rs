pub mod farmer;
pub mod field;
pub mod history;

mod store;

use crate::db::{farmer::FarmerExecutor, field::FieldExecutor, history::HistoryExecutor};
use std::sync::Arc;

///
/// Db
///
/// Handle to one in-memory store. Cloning is cheap and every clone sees
/// the same state, so a handle can be shared across threads freely.
/// Operations are reached through the executor accessors.
///

#[derive(Clone, Debug, Default)]
pub struct Db {
    store: Arc<store::Store>,
}

impl Db {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn farmers(&self) -> FarmerExecutor<'_> {
        FarmerExecutor::new(self)
    }

    #[must_use]
    pub const fn fields(&self) -> FieldExecutor<'_> {
        FieldExecutor::new(self)
    }

    #[must_use]
    pub const fn history(&self) -> HistoryExecutor<'_> {
        HistoryExecutor::new(self)
    }
}
