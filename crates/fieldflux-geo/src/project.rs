//! Equal-area projection and acreage.
//!
//! Acreage must reflect true ground area, so boundaries are reprojected
//! from WGS84 lon/lat into EPSG:6933 (Lambert cylindrical equal-area on
//! the WGS84 ellipsoid, standard parallel 30°) before the planar shoelace
//! area is taken. The forward transform is closed-form per point; see
//! Snyder, "Map Projections: A Working Manual", eq. 10-1/10-2 and 3-12.

use crate::{Boundary, SQUARE_METERS_PER_ACRE};
use geo::{Area, Coord, MapCoords};

/// WGS84 semi-major axis in meters.
const SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;

/// WGS84 inverse flattening denominator.
const INVERSE_FLATTENING: f64 = 298.257_223_563;

/// EPSG:6933 standard parallel, degrees.
const STANDARD_PARALLEL_DEG: f64 = 30.0;

///
/// EqualArea
///
/// Derived constants of the ellipsoidal cylindrical equal-area forward
/// transform. Cheap to build; rebuilt per projection call.
///

struct EqualArea {
    e: f64,
    e_sq: f64,
    k0: f64,
}

impl EqualArea {
    fn new() -> Self {
        let f = 1.0 / INVERSE_FLATTENING;
        let e_sq = f * (2.0 - f);
        let e = e_sq.sqrt();

        let phi_s = STANDARD_PARALLEL_DEG.to_radians();
        let sin_s = phi_s.sin();
        let k0 = phi_s.cos() / (1.0 - e_sq * sin_s * sin_s).sqrt();

        Self { e, e_sq, k0 }
    }

    /// Authalic area function q(φ).
    fn authalic_q(&self, phi: f64) -> f64 {
        let sin_phi = phi.sin();
        let e_sin = self.e * sin_phi;

        (1.0 - self.e_sq)
            * (sin_phi / (1.0 - self.e_sq * sin_phi * sin_phi)
                - (1.0 / (2.0 * self.e)) * ((1.0 - e_sin) / (1.0 + e_sin)).ln())
    }

    /// Forward transform: lon/lat degrees to projected meters.
    fn forward(&self, coord: Coord<f64>) -> Coord<f64> {
        let lambda = coord.x.to_radians();
        let phi = coord.y.to_radians();

        Coord {
            x: SEMI_MAJOR_AXIS_M * self.k0 * lambda,
            y: SEMI_MAJOR_AXIS_M * self.authalic_q(phi) / (2.0 * self.k0),
        }
    }
}

/// Planar ground area of a boundary in square meters.
#[must_use]
pub fn square_meters(boundary: &Boundary) -> f64 {
    let projection = EqualArea::new();
    let projected = boundary
        .as_polygon()
        .map_coords(|coord| projection.forward(coord));

    projected.unsigned_area()
}

/// Derived acreage for a boundary, rounded to 4 decimal places.
///
/// Deterministic for a given boundary and invariant under ring winding
/// reversal and ring rotation.
#[must_use]
pub fn acreage(boundary: &Boundary) -> f64 {
    round_acres(square_meters(boundary) / SQUARE_METERS_PER_ACRE)
}

/// Round an acreage value to 4 decimal places, ties to even.
///
/// Half-to-even matches the rounding the stored acreage values were
/// produced with; changing it would shift exact 4th-decimal ties.
#[must_use]
pub fn round_acres(value: f64) -> f64 {
    (value * 10_000.0).round_ties_even() / 10_000.0
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn boundary(ring: Vec<Vec<f64>>) -> Boundary {
        Boundary::from_ring(ring).unwrap()
    }

    fn square(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> Boundary {
        boundary(vec![
            vec![lon0, lat0],
            vec![lon0, lat1],
            vec![lon1, lat1],
            vec![lon1, lat0],
            vec![lon0, lat0],
        ])
    }

    #[test]
    fn acreage_is_positive_and_deterministic() {
        let b = square(0.0, 0.0, 1.0, 1.0);
        let first = acreage(&b);
        let second = acreage(&b);

        assert!(first > 0.0);
        assert_eq!(first, second);
    }

    #[test]
    fn equatorial_degree_square_is_about_three_million_acres() {
        // 1°x1° at the equator is roughly 12,300 km²; anything far outside
        // that band means the projection constants are wrong.
        let acres = acreage(&square(0.0, 0.0, 1.0, 1.0));
        assert!((3_000_000.0..3_100_000.0).contains(&acres), "got {acres}");
    }

    #[test]
    fn winding_reversal_does_not_change_acreage() {
        let ring = vec![
            vec![10.0, 45.0],
            vec![10.0, 45.2],
            vec![10.3, 45.2],
            vec![10.3, 45.0],
            vec![10.0, 45.0],
        ];
        let mut reversed = ring.clone();
        reversed.reverse();

        assert_eq!(
            acreage(&boundary(ring)),
            acreage(&boundary(reversed)),
        );
    }

    #[test]
    fn ring_rotation_does_not_change_acreage() {
        let a = boundary(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![1.0, 0.0],
            vec![0.0, 0.0],
        ]);
        // Same ring, same winding, different starting vertex.
        let b = boundary(vec![
            vec![1.0, 1.0],
            vec![1.0, 0.0],
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
        ]);

        assert_eq!(acreage(&a), acreage(&b));
    }

    #[test]
    fn round_acres_is_half_to_even() {
        assert_eq!(round_acres(1.00005), 1.0);
        assert_eq!(round_acres(1.00015), 1.0002);
        assert_eq!(round_acres(2.5), 2.5);
    }

    proptest! {
        #[test]
        fn rectangle_acreage_survives_winding_reversal(
            lon0 in -170.0f64..170.0,
            lat0 in -80.0f64..80.0,
            width in 0.01f64..5.0,
            height in 0.01f64..5.0,
        ) {
            let (lon1, lat1) = (lon0 + width.min(179.0 - lon0), lat0 + height.min(89.0 - lat0));
            prop_assume!(lon1 > lon0 && lat1 > lat0);

            let ring = vec![
                vec![lon0, lat0],
                vec![lon0, lat1],
                vec![lon1, lat1],
                vec![lon1, lat0],
                vec![lon0, lat0],
            ];
            let mut reversed = ring.clone();
            reversed.reverse();

            // Compare the raw areas: summation order differs between the
            // two windings, so allow float noise well below rounding scale.
            let forward = square_meters(&boundary(ring));
            let backward = square_meters(&boundary(reversed));

            prop_assert!(forward > 0.0);
            prop_assert!((forward - backward).abs() / forward < 1e-9);
        }

        #[test]
        fn rectangle_acreage_is_longitude_invariant(shift in -90.0f64..90.0) {
            // Cylindrical equal-area: x depends only on lon, so sliding a
            // rectangle along the equator must not change its area.
            let base = square_meters(&square(0.0, 10.0, 1.0, 11.0));
            let moved = square_meters(&square(shift, 10.0, shift + 1.0, 11.0));

            prop_assert!((base - moved).abs() / base < 1e-9);
        }
    }
}
