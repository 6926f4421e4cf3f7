use crate::{
    db::{Db, store::Tables},
    model::{HistoryAction, HistoryEntry},
    obs::sink::{self, MetricsEvent},
    types::{FieldId, HistoryId, Timestamp},
};

/// Append one audit entry inside an already-held write lock, so the entry
/// commits atomically with the mutation it records.
pub(crate) fn append(
    tables: &mut Tables,
    field_id: FieldId,
    action: HistoryAction,
    payload: serde_json::Value,
) -> HistoryEntry {
    let entry = HistoryEntry {
        id: HistoryId::new(),
        field_id,
        action,
        timestamp: Timestamp::now(),
        payload,
    };
    tables.history.push(entry.clone());
    sink::record(MetricsEvent::HistoryAppended);

    entry
}

///
/// HistoryExecutor
/// Read-only views over the audit log.
///

pub struct HistoryExecutor<'a> {
    db: &'a Db,
}

impl<'a> HistoryExecutor<'a> {
    pub(crate) const fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Entries for one field, oldest first.
    #[must_use]
    pub fn for_field(&self, field_id: FieldId) -> Vec<HistoryEntry> {
        self.db.store.with_read(|tables| {
            tables
                .history
                .iter()
                .filter(|entry| entry.field_id == field_id)
                .cloned()
                .collect()
        })
    }

    /// The full log in commit order.
    #[must_use]
    pub fn all(&self) -> Vec<HistoryEntry> {
        self.db.store.with_read(|tables| tables.history.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.db.store.with_read(|tables| tables.history.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
