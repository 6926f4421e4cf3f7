use crate::{
    db::{Db, history},
    error::Error,
    model::{DEFAULT_FARMER_NAME, Farmer, FarmerDraft, FarmerSummary, HistoryAction, sanitized_name},
    obs::sink::{self, MetricsEvent},
    types::{FarmerId, FieldId},
};
use fieldflux_geo::project;

///
/// FarmerExecutor
///

pub struct FarmerExecutor<'a> {
    db: &'a Db,
}

impl<'a> FarmerExecutor<'a> {
    pub(crate) const fn new(db: &'a Db) -> Self {
        Self { db }
    }

    // ========================================================================
    // reads
    // ========================================================================

    #[must_use]
    pub fn get(&self, farmer_id: FarmerId) -> Option<Farmer> {
        self.db
            .store
            .with_read(|tables| tables.farmers.get(&farmer_id).cloned())
    }

    pub fn expect(&self, farmer_id: FarmerId) -> Result<Farmer, Error> {
        self.get(farmer_id).ok_or(Error::FarmerNotFound(farmer_id))
    }

    #[must_use]
    pub fn exists(&self, farmer_id: FarmerId) -> bool {
        self.db
            .store
            .with_read(|tables| tables.farmers.contains_key(&farmer_id))
    }

    /// All farmers in id order.
    #[must_use]
    pub fn list(&self) -> Vec<Farmer> {
        self.db
            .store
            .with_read(|tables| tables.farmers.values().cloned().collect())
    }

    /// One farmer's aggregate field stats.
    pub fn summary(&self, farmer_id: FarmerId) -> Result<FarmerSummary, Error> {
        self.db.store.with_read(|tables| {
            let farmer = tables
                .farmers
                .get(&farmer_id)
                .cloned()
                .ok_or(Error::FarmerNotFound(farmer_id))?;

            Ok(summarize(
                farmer,
                tables.fields_for_farmer(farmer_id).map(|field| field.acres),
            ))
        })
    }

    /// Aggregate stats for every farmer, in id order.
    #[must_use]
    pub fn summaries(&self) -> Vec<FarmerSummary> {
        self.db.store.with_read(|tables| {
            tables
                .farmers
                .values()
                .map(|farmer| {
                    summarize(
                        farmer.clone(),
                        tables.fields_for_farmer(farmer.id).map(|field| field.acres),
                    )
                })
                .collect()
        })
    }

    // ========================================================================
    // mutations
    // ========================================================================

    /// Register a new farmer. Needs no entry lock: the fresh id cannot
    /// collide with any in-flight field mutation.
    #[must_use]
    pub fn create(&self, draft: FarmerDraft) -> Farmer {
        let farmer = Farmer {
            id: FarmerId::new(),
            name: sanitized_name(draft.name.as_deref(), DEFAULT_FARMER_NAME),
            contact: draft.contact.unwrap_or_default(),
        };

        self.db.store.with_write(|tables| {
            tables.farmers.insert(farmer.id, farmer.clone());
        });
        sink::record(MetricsEvent::FarmerCreated);

        farmer
    }

    /// Apply changes to an existing farmer. Omitted or blank values keep
    /// the stored ones.
    pub fn update(&self, farmer_id: FarmerId, draft: FarmerDraft) -> Result<Farmer, Error> {
        self.db.store.serialized(farmer_id, || {
            let existing = self.expect(farmer_id)?;

            let updated = Farmer {
                id: existing.id,
                name: sanitized_name(draft.name.as_deref(), &existing.name),
                contact: draft.contact.unwrap_or(existing.contact),
            };

            self.db.store.with_write(|tables| {
                tables.farmers.insert(farmer_id, updated.clone());
            });
            sink::record(MetricsEvent::FarmerUpdated);

            Ok(updated)
        })
    }

    /// Remove a farmer and cascade-delete their fields. Each removed field
    /// gets its own audit entry, so the log accounts for every row that
    /// ever existed.
    pub fn delete(&self, farmer_id: FarmerId) -> Result<(), Error> {
        let removed = self.db.store.serialized(farmer_id, || {
            self.db.store.with_write(|tables| {
                if tables.farmers.remove(&farmer_id).is_none() {
                    return Err(Error::FarmerNotFound(farmer_id));
                }

                let doomed: Vec<FieldId> = tables
                    .fields_for_farmer(farmer_id)
                    .map(|field| field.id)
                    .collect();
                for field_id in &doomed {
                    tables.fields.remove(field_id);
                    history::append(
                        tables,
                        *field_id,
                        HistoryAction::Deleted,
                        serde_json::json!({ "fieldId": field_id, "cascade": true }),
                    );
                }

                Ok(doomed.len())
            })
        })?;

        self.db.store.release_entry_lock(farmer_id);
        sink::record(MetricsEvent::FarmerDeleted {
            fields_removed: removed as u64,
        });

        Ok(())
    }
}

fn summarize(farmer: Farmer, acres: impl Iterator<Item = f64>) -> FarmerSummary {
    let mut field_count = 0;
    let mut total = 0.0;
    for a in acres {
        field_count += 1;
        total += a;
    }

    FarmerSummary {
        farmer,
        field_count,
        total_acres: project::round_acres(total),
    }
}
