//! End-to-end coverage of the field pipeline: normalize, overlap-check,
//! project, commit, record.

use fieldflux_core::prelude::*;
use serde_json::json;
use std::thread;

fn polygon(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> serde_json::Value {
    json!({
        "type": "Polygon",
        "coordinates": [[
            [lon0, lat0],
            [lon0, lat1],
            [lon1, lat1],
            [lon1, lat0],
            [lon0, lat0],
        ]]
    })
}

fn field_draft(name: &str, geometry: serde_json::Value) -> FieldDraft {
    FieldDraft::new().name(name).geometry(geometry)
}

#[test]
fn create_rejects_overlap_but_allows_edge_contact() {
    let db = Db::new();
    let farmer = db.farmers().create(FarmerDraft::named("Ada"));

    // A at [0,1]x[0,1].
    let a = db
        .fields()
        .create(farmer.id, field_draft("North Paddock", polygon(0.0, 0.0, 1.0, 1.0)))
        .unwrap();
    assert!(a.acres > 0.0);

    // B overlaps A's upper-right quadrant and must be rejected by name.
    let err = db
        .fields()
        .create(farmer.id, field_draft("Annex", polygon(0.5, 0.5, 1.5, 1.5)))
        .unwrap_err();
    match err {
        Error::OverlappingField { name } => assert_eq!(name, "North Paddock"),
        other => panic!("expected overlap rejection, got {other}"),
    }

    // C shares only the edge lon=1 with A, which is legal.
    let c = db
        .fields()
        .create(farmer.id, field_draft("East Strip", polygon(1.0, 0.0, 2.0, 1.0)))
        .unwrap();
    assert_ne!(a.id, c.id);

    let fields = db.fields().list_for_farmer(farmer.id).unwrap();
    assert_eq!(fields.len(), 2);

    // The rejected create appended nothing.
    assert_eq!(db.history().len(), 2);
}

#[test]
fn reads_return_independent_copies() {
    let db = Db::new();
    let farmer = db.farmers().create(FarmerDraft::named("Ada"));
    let field = db
        .fields()
        .create(farmer.id, field_draft("Home", polygon(0.0, 0.0, 1.0, 1.0)))
        .unwrap();

    let mut copy = db.fields().get(field.id).unwrap();
    copy.name = "Scribbled".to_string();
    copy.acres = -1.0;

    assert_eq!(db.fields().get(field.id).unwrap(), field);
}

#[test]
fn overlap_rule_is_scoped_to_one_farmer() {
    let db = Db::new();
    let ada = db.farmers().create(FarmerDraft::named("Ada"));
    let ben = db.farmers().create(FarmerDraft::named("Ben"));

    db.fields()
        .create(ada.id, field_draft("Shared Ground", polygon(0.0, 0.0, 1.0, 1.0)))
        .unwrap();

    // Identical footprint under a different farmer is allowed.
    let duplicate = db
        .fields()
        .create(ben.id, field_draft("Shared Ground", polygon(0.0, 0.0, 1.0, 1.0)));
    assert!(duplicate.is_ok());
}

#[test]
fn update_excludes_the_field_itself_from_overlap() {
    let db = Db::new();
    let farmer = db.farmers().create(FarmerDraft::named("Ada"));
    let field = db
        .fields()
        .create(farmer.id, field_draft("Home", polygon(0.0, 0.0, 1.0, 1.0)))
        .unwrap();

    // Shrinking inside the field's own old footprint must not self-conflict.
    let shrunk = db
        .fields()
        .update(
            farmer.id,
            field.id,
            FieldDraft::new().geometry(polygon(0.1, 0.1, 0.9, 0.9)),
        )
        .unwrap();

    assert!(shrunk.acres < field.acres);
    assert_eq!(shrunk.id, field.id);
}

#[test]
fn update_keeps_omitted_attributes_and_recomputes_acres() {
    let db = Db::new();
    let farmer = db.farmers().create(FarmerDraft::named("Ada"));
    let field = db
        .fields()
        .create(
            farmer.id,
            field_draft("Home", polygon(0.0, 0.0, 1.0, 1.0)).notes("clay soil"),
        )
        .unwrap();

    // Geometry-only update: name and notes survive, acreage tracks the ring.
    let updated = db
        .fields()
        .update(
            farmer.id,
            field.id,
            FieldDraft::new().geometry(polygon(0.0, 0.0, 2.0, 1.0)),
        )
        .unwrap();
    assert_eq!(updated.name, "Home");
    assert_eq!(updated.notes, "clay soil");
    assert!(updated.acres > field.acres);

    // Name-only update: geometry and acreage untouched, blank name ignored.
    let renamed = db
        .fields()
        .update(farmer.id, field.id, FieldDraft::new().name("Long Home"))
        .unwrap();
    assert_eq!(renamed.acres, updated.acres);

    let blanked = db
        .fields()
        .update(farmer.id, field.id, FieldDraft::new().name("   "))
        .unwrap();
    assert_eq!(blanked.name, "Long Home");
}

#[test]
fn invalid_geometry_fails_without_partial_writes() {
    let db = Db::new();
    let farmer = db.farmers().create(FarmerDraft::named("Ada"));

    let bowtie = json!({
        "type": "Polygon",
        "coordinates": [[
            [0.0, 0.0], [1.0, 1.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0],
        ]]
    });
    let err = db.fields().create(farmer.id, field_draft("Bad", bowtie)).unwrap_err();
    assert!(matches!(err, Error::InvalidGeometry(_)));

    let missing = db
        .fields()
        .create(farmer.id, FieldDraft::new().name("No Shape"))
        .unwrap_err();
    assert!(matches!(
        missing,
        Error::InvalidGeometry(GeometryError::Missing)
    ));

    assert!(db.fields().list_for_farmer(farmer.id).unwrap().is_empty());
    assert!(db.history().is_empty());
}

#[test]
fn unknown_owners_and_fields_are_typed_failures() {
    let db = Db::new();
    let farmer = db.farmers().create(FarmerDraft::named("Ada"));
    let ghost_farmer = FarmerId::new();
    let ghost_field = FieldId::new();

    let err = db
        .fields()
        .create(ghost_farmer, field_draft("Nowhere", polygon(0.0, 0.0, 1.0, 1.0)))
        .unwrap_err();
    assert!(matches!(err, Error::FarmerNotFound(id) if id == ghost_farmer));

    let err = db
        .fields()
        .update(farmer.id, ghost_field, FieldDraft::new().name("x"))
        .unwrap_err();
    assert!(matches!(err, Error::FieldNotFound(id) if id == ghost_field));

    // Deleting a missing field is a no-op, not an error.
    assert!(!db.fields().delete(farmer.id, ghost_field).unwrap());
    assert!(db.history().is_empty());
}

#[test]
fn history_is_append_only_with_monotonic_ids() {
    let db = Db::new();
    let farmer = db.farmers().create(FarmerDraft::named("Ada"));
    let field = db
        .fields()
        .create(farmer.id, field_draft("Home", polygon(0.0, 0.0, 1.0, 1.0)))
        .unwrap();

    db.fields()
        .update(farmer.id, field.id, FieldDraft::new().name("Renamed"))
        .unwrap();
    assert!(db.fields().delete(farmer.id, field.id).unwrap());

    let log = db.history().for_field(field.id);
    assert_eq!(log.len(), 3);
    assert_eq!(log[0].action, HistoryAction::Created);
    assert_eq!(log[1].action, HistoryAction::Updated);
    assert_eq!(log[2].action, HistoryAction::Deleted);
    assert!(log[0].id < log[1].id && log[1].id < log[2].id);
    assert!(log[0].timestamp <= log[1].timestamp);

    // The update entry carries the pre-update state.
    assert_eq!(log[1].payload["name"], json!("Home"));
    assert_eq!(log[2].payload["fieldId"], json!(field.id.to_string()));
}

#[test]
fn deleting_a_farmer_cascades_with_audit_entries() {
    let db = Db::new();
    let farmer = db.farmers().create(FarmerDraft::named("Ada"));
    let keeper = db.farmers().create(FarmerDraft::named("Ben"));

    let doomed = db
        .fields()
        .create(farmer.id, field_draft("Home", polygon(0.0, 0.0, 1.0, 1.0)))
        .unwrap();
    let kept = db
        .fields()
        .create(keeper.id, field_draft("Safe", polygon(5.0, 5.0, 6.0, 6.0)))
        .unwrap();

    db.farmers().delete(farmer.id).unwrap();

    assert!(db.farmers().get(farmer.id).is_none());
    assert!(db.fields().get(doomed.id).is_none());
    assert!(db.fields().get(kept.id).is_some());

    let log = db.history().for_field(doomed.id);
    assert_eq!(log.last().map(|entry| entry.action), Some(HistoryAction::Deleted));
    assert_eq!(log.last().map(|entry| entry.payload["cascade"].clone()), Some(json!(true)));

    let err = db.farmers().delete(farmer.id).unwrap_err();
    assert!(matches!(err, Error::FarmerNotFound(_)));
}

#[test]
fn summaries_total_rounded_acreage() {
    let db = Db::new();
    let farmer = db.farmers().create(FarmerDraft::named("Ada").contact("ada@example.com"));

    let a = db
        .fields()
        .create(farmer.id, field_draft("A", polygon(0.0, 0.0, 1.0, 1.0)))
        .unwrap();
    let b = db
        .fields()
        .create(farmer.id, field_draft("B", polygon(2.0, 0.0, 3.0, 1.0)))
        .unwrap();

    let summary = db.farmers().summary(farmer.id).unwrap();
    assert_eq!(summary.field_count, 2);
    assert!((summary.total_acres - (a.acres + b.acres)).abs() < 1e-4);
    assert_eq!(summary.farmer.contact, "ada@example.com");

    assert_eq!(db.farmers().summaries().len(), 1);
}

#[test]
fn racing_overlapping_creates_admit_exactly_one() {
    let db = Db::new();
    let farmer = db.farmers().create(FarmerDraft::named("Ada"));

    let handles: Vec<_> = (0..2)
        .map(|i| {
            let db = db.clone();
            thread::spawn(move || {
                db.fields().create(
                    farmer.id,
                    field_draft(&format!("claim-{i}"), polygon(0.0, 0.0, 1.0, 1.0)),
                )
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(Error::OverlappingField { .. })))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(db.fields().list_for_farmer(farmer.id).unwrap().len(), 1);
}

#[test]
fn handles_share_state_across_clones() {
    let db = Db::new();
    let other = db.clone();

    let farmer = db.farmers().create(FarmerDraft::named("Ada"));
    assert!(other.farmers().exists(farmer.id));

    let listed = other.farmers().list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Ada");
}
