//! Overlap predicate between field boundaries.
//!
//! The contract: any intersection beyond boundary contact is a conflict.
//! Sharing an edge or a vertex is legal; shared interior area of any size
//! is not, which also makes exact duplicates and full containment
//! conflicts. Boolean clipping comes from `geo` rather than hand-rolled
//! segment predicates, since both inputs are already validated simple
//! polygons.

use crate::Boundary;
use geo::{Area, BooleanOps, Intersects};

/// True when two boundaries intersect in more than boundary contact.
#[must_use]
pub fn conflicts(existing: &Boundary, candidate: &Boundary) -> bool {
    let a = existing.as_polygon();
    let b = candidate.as_polygon();

    if !a.intersects(b) {
        return false;
    }

    // Touching rings clip to an empty or zero-area result; anything with
    // positive area means shared interior.
    a.intersection(b).unsigned_area() > 0.0
}

///
/// TESTS
///
