use crate::{
    model::{Farmer, Field, HistoryEntry},
    types::{FarmerId, FieldId},
};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, RwLock},
};

///
/// Tables
///
/// The three relations behind the store. `history` is append-only:
/// entries are pushed in commit order and never rewritten.
///

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub farmers: BTreeMap<FarmerId, Farmer>,
    pub fields: BTreeMap<FieldId, Field>,
    pub history: Vec<HistoryEntry>,
}

impl Tables {
    /// Fields belonging to one farmer, in id order.
    pub fn fields_for_farmer(&self, farmer_id: FarmerId) -> impl Iterator<Item = &Field> {
        self.fields
            .values()
            .filter(move |field| field.farmer_id == farmer_id)
    }
}

///
/// Store
///
/// Shared state plus the per-farmer serialization registry. Table access
/// goes through short closure-scoped read/write locks; mutations that
/// must observe a consistent sibling set first take the owning farmer's
/// entry lock via [`Store::serialized`], which spans the whole
/// check-then-commit window.
///

#[derive(Debug, Default)]
pub(crate) struct Store {
    tables: RwLock<Tables>,
    farmer_locks: Mutex<BTreeMap<FarmerId, Arc<Mutex<()>>>>,
}

impl Store {
    pub fn with_read<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        let tables = self.tables.read().expect("store lock poisoned");

        f(&tables)
    }

    pub fn with_write<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut tables = self.tables.write().expect("store lock poisoned");

        f(&mut tables)
    }

    /// Run `f` while holding the farmer's entry lock. Concurrent writers
    /// against the same farmer queue here; writers for other farmers
    /// proceed independently.
    pub fn serialized<R>(&self, farmer_id: FarmerId, f: impl FnOnce() -> R) -> R {
        let entry = self.entry_lock(farmer_id);
        let _guard: MutexGuard<'_, ()> = entry.lock().expect("farmer entry lock poisoned");

        f()
    }

    fn entry_lock(&self, farmer_id: FarmerId) -> Arc<Mutex<()>> {
        let mut locks = self.farmer_locks.lock().expect("lock registry poisoned");

        locks.entry(farmer_id).or_default().clone()
    }

    /// Drop the registry entry once a farmer is gone. A racer still
    /// holding the old Arc finishes against it and then finds the farmer
    /// missing under the table lock.
    pub fn release_entry_lock(&self, farmer_id: FarmerId) {
        let mut locks = self.farmer_locks.lock().expect("lock registry poisoned");

        locks.remove(&farmer_id);
    }
}

///
/// TESTS
///
