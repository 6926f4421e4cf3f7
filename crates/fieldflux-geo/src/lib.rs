//! Geometry core for FieldFlux: validated polygon boundaries, equal-area
//! acreage, and the overlap predicate used to police sibling fields.
//!
//! Everything in this crate is pure. Storage, orchestration, and history
//! live in `fieldflux-core` and call in through `Boundary`,
//! [`project::acreage`], and [`overlap::conflicts`].

pub mod boundary;
pub mod overlap;
pub mod project;

pub use boundary::{Boundary, GeometryError};

///
/// CONSTANTS
///

/// Square meters per acre, the conversion constant for derived acreage.
pub const SQUARE_METERS_PER_ACRE: f64 = 4_046.856_422_4;
