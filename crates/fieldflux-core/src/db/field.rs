use crate::{
    db::{Db, history},
    error::Error,
    model::{DEFAULT_FIELD_NAME, Field, FieldDraft, HistoryAction, sanitized_name},
    obs::sink::{self, MetricsEvent},
    types::{FarmerId, FieldId},
};
use fieldflux_geo::{Boundary, overlap, project};

///
/// FieldExecutor
///
/// Every mutation runs the same shape: take the owning farmer's entry
/// lock, validate against a consistent sibling snapshot, then commit the
/// row and its audit entry under one write lock. A failure at any stage
/// leaves the tables untouched.
///

pub struct FieldExecutor<'a> {
    db: &'a Db,
}

impl<'a> FieldExecutor<'a> {
    pub(crate) const fn new(db: &'a Db) -> Self {
        Self { db }
    }

    // ========================================================================
    // reads
    // ========================================================================

    #[must_use]
    pub fn get(&self, field_id: FieldId) -> Option<Field> {
        self.db
            .store
            .with_read(|tables| tables.fields.get(&field_id).cloned())
    }

    /// Like [`get`](Self::get) but typed as a lookup failure.
    pub fn expect(&self, field_id: FieldId) -> Result<Field, Error> {
        self.get(field_id).ok_or(Error::FieldNotFound(field_id))
    }

    /// All fields owned by one farmer, in id order.
    pub fn list_for_farmer(&self, farmer_id: FarmerId) -> Result<Vec<Field>, Error> {
        self.db.store.with_read(|tables| {
            if !tables.farmers.contains_key(&farmer_id) {
                return Err(Error::FarmerNotFound(farmer_id));
            }

            Ok(tables.fields_for_farmer(farmer_id).cloned().collect())
        })
    }

    // ========================================================================
    // mutations
    // ========================================================================

    /// Validate and persist a new field.
    ///
    /// Geometry is mandatory on create. The boundary is checked against
    /// every sibling field of the same farmer; edge and vertex contact is
    /// legal, shared interior area is not.
    pub fn create(&self, farmer_id: FarmerId, draft: FieldDraft) -> Result<Field, Error> {
        self.db.store.serialized(farmer_id, || {
            let siblings = self.sibling_snapshot(farmer_id)?;

            let boundary = decode_boundary(draft.geometry.as_ref())?;
            ensure_no_overlap(&siblings, &boundary, None)?;

            let field = Field {
                id: FieldId::new(),
                farmer_id,
                name: sanitized_name(draft.name.as_deref(), DEFAULT_FIELD_NAME),
                notes: draft.notes.unwrap_or_default(),
                acres: project::acreage(&boundary),
                boundary,
            };
            let snapshot = snapshot(&field)?;

            self.db.store.with_write(|tables| {
                if tables.fields.contains_key(&field.id) {
                    return Err(Error::StoreInvariant {
                        message: format!("duplicate field id on insert: {}", field.id),
                    });
                }
                tables.fields.insert(field.id, field.clone());
                history::append(tables, field.id, HistoryAction::Created, snapshot);

                Ok(())
            })?;
            sink::record(MetricsEvent::FieldCreated);

            Ok(field)
        })
    }

    /// Validate and apply changes to an existing field.
    ///
    /// Omitted or blank draft values keep the stored ones; a new geometry
    /// re-runs the full validate-project pipeline with the field's own
    /// prior boundary excluded from the overlap check. The audit entry
    /// carries the pre-update state.
    pub fn update(
        &self,
        farmer_id: FarmerId,
        field_id: FieldId,
        draft: FieldDraft,
    ) -> Result<Field, Error> {
        self.db.store.serialized(farmer_id, || {
            let siblings = self.sibling_snapshot(farmer_id)?;
            let existing = siblings
                .iter()
                .find(|field| field.id == field_id)
                .cloned()
                .ok_or(Error::FieldNotFound(field_id))?;

            let boundary = match draft.geometry.as_ref() {
                Some(raw) => {
                    let boundary = decode_boundary(Some(raw))?;
                    ensure_no_overlap(&siblings, &boundary, Some(field_id))?;
                    boundary
                }
                None => existing.boundary.clone(),
            };

            let updated = Field {
                id: existing.id,
                farmer_id,
                name: sanitized_name(draft.name.as_deref(), &existing.name),
                notes: draft.notes.unwrap_or_else(|| existing.notes.clone()),
                acres: project::acreage(&boundary),
                boundary,
            };
            let previous = snapshot(&existing)?;

            self.db.store.with_write(|tables| {
                if !tables.fields.contains_key(&field_id) {
                    return Err(Error::StoreInvariant {
                        message: format!("field vanished mid-update: {field_id}"),
                    });
                }
                tables.fields.insert(field_id, updated.clone());
                history::append(tables, field_id, HistoryAction::Updated, previous);

                Ok(())
            })?;
            sink::record(MetricsEvent::FieldUpdated);

            Ok(updated)
        })
    }

    /// Remove a field. Returns whether anything was deleted; a missing
    /// field is not an error, and writes no audit entry.
    pub fn delete(&self, farmer_id: FarmerId, field_id: FieldId) -> Result<bool, Error> {
        self.db.store.serialized(farmer_id, || {
            let owned = self.db.store.with_read(|tables| {
                if !tables.farmers.contains_key(&farmer_id) {
                    return Err(Error::FarmerNotFound(farmer_id));
                }

                Ok(tables
                    .fields
                    .get(&field_id)
                    .is_some_and(|field| field.farmer_id == farmer_id))
            })?;
            if !owned {
                return Ok(false);
            }

            self.db.store.with_write(|tables| {
                if tables.fields.remove(&field_id).is_some() {
                    history::append(
                        tables,
                        field_id,
                        HistoryAction::Deleted,
                        serde_json::json!({ "fieldId": field_id }),
                    );
                }
            });
            sink::record(MetricsEvent::FieldDeleted);

            Ok(true)
        })
    }

    fn sibling_snapshot(&self, farmer_id: FarmerId) -> Result<Vec<Field>, Error> {
        self.db.store.with_read(|tables| {
            if !tables.farmers.contains_key(&farmer_id) {
                return Err(Error::FarmerNotFound(farmer_id));
            }

            Ok(tables.fields_for_farmer(farmer_id).cloned().collect())
        })
    }
}

// normalize raw GeoJSON into a validated boundary
fn decode_boundary(geometry: Option<&serde_json::Value>) -> Result<Boundary, Error> {
    Boundary::from_geojson(geometry).map_err(|err| {
        sink::record(MetricsEvent::GeometryRejected);
        Error::InvalidGeometry(err)
    })
}

// reject any sibling that shares interior area with the candidate
fn ensure_no_overlap(
    siblings: &[Field],
    candidate: &Boundary,
    exclude: Option<FieldId>,
) -> Result<(), Error> {
    for sibling in siblings {
        if exclude == Some(sibling.id) {
            continue;
        }
        if overlap::conflicts(&sibling.boundary, candidate) {
            sink::record(MetricsEvent::OverlapRejected);
            return Err(Error::OverlappingField {
                name: sibling.name.clone(),
            });
        }
    }

    Ok(())
}

fn snapshot(field: &Field) -> Result<serde_json::Value, Error> {
    serde_json::to_value(field).map_err(|err| Error::StoreInvariant {
        message: format!("field snapshot failed: {err}"),
    })
}
