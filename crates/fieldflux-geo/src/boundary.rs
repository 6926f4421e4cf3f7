use geo::{Area, Coord, LineString, Polygon, algorithm::Validation};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error as ThisError;

///
/// GeometryError
///
/// Why a submitted geometry was rejected. Every variant carries enough
/// context for a caller-facing message; none are retryable without the
/// caller changing the input.
///

#[derive(Debug, ThisError)]
pub enum GeometryError {
    #[error("geometry is required")]
    Missing,

    #[error("geometry does not decode: {0}")]
    Decode(String),

    #[error("geometry must be a Polygon, found {found}")]
    NotAPolygon { found: &'static str },

    #[error("polygon must not contain interior rings")]
    InteriorRings,

    #[error("position must be a 2d lon/lat pair")]
    NotTwoDimensional,

    #[error("coordinate out of range: ({lon}, {lat})")]
    CoordinateOutOfRange { lon: f64, lat: f64 },

    #[error("polygon ring must contain at least 4 positions, found {len}")]
    TooFewPositions { len: usize },

    #[error("polygon ring is not closed")]
    UnclosedRing,

    #[error("polygon geometry is empty")]
    Empty,

    #[error("polygon geometry is invalid: {reason}")]
    Invalid { reason: String },
}

///
/// Boundary
///
/// A validated, simple, single-ring polygon in WGS84 lon/lat order.
/// Construction is the only validation gate: any `Boundary` value is
/// well-formed, closed, non-empty, and free of self-intersection.
/// Winding order is accepted as submitted and preserved.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Boundary {
    polygon: Polygon<f64>,
}

impl Boundary {
    /// Normalize a raw GeoJSON geometry value into a validated boundary.
    ///
    /// `None` and JSON `null` both mean the caller supplied no geometry.
    pub fn from_geojson(raw: Option<&serde_json::Value>) -> Result<Self, GeometryError> {
        let raw = match raw {
            None => return Err(GeometryError::Missing),
            Some(value) if value.is_null() => return Err(GeometryError::Missing),
            Some(value) => value,
        };

        let geometry: geojson::Geometry = serde_json::from_value(raw.clone())
            .map_err(|err| GeometryError::Decode(err.to_string()))?;

        Self::from_geometry(geometry)
    }

    /// Normalize an already-decoded GeoJSON geometry object.
    pub fn from_geometry(geometry: geojson::Geometry) -> Result<Self, GeometryError> {
        let mut rings = match geometry.value {
            geojson::Value::Polygon(rings) => rings,
            other => {
                return Err(GeometryError::NotAPolygon {
                    found: value_type_name(&other),
                });
            }
        };

        if rings.is_empty() {
            return Err(GeometryError::Empty);
        }
        // Holes are out of scope; a second ring is always rejected.
        if rings.len() > 1 {
            return Err(GeometryError::InteriorRings);
        }

        Self::from_ring(rings.remove(0))
    }

    /// Validate a raw exterior ring of `[lon, lat]` positions.
    ///
    /// Ring closure and arity are checked here on the raw positions, before
    /// `geo::Polygon` construction, because `Polygon::new` silently closes
    /// an open ring.
    pub fn from_ring(ring: Vec<Vec<f64>>) -> Result<Self, GeometryError> {
        for position in &ring {
            if position.len() != 2 {
                return Err(GeometryError::NotTwoDimensional);
            }
            let (lon, lat) = (position[0], position[1]);
            if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
                return Err(GeometryError::CoordinateOutOfRange { lon, lat });
            }
        }

        if ring.len() < 4 {
            return Err(GeometryError::TooFewPositions { len: ring.len() });
        }
        if ring.first() != ring.last() {
            return Err(GeometryError::UnclosedRing);
        }

        let coords: Vec<Coord<f64>> = ring
            .iter()
            .map(|position| Coord {
                x: position[0],
                y: position[1],
            })
            .collect();
        let polygon = Polygon::new(LineString::from(coords), Vec::new());

        if let Err(problem) = polygon.check_validation() {
            return Err(GeometryError::Invalid {
                reason: problem.to_string(),
            });
        }
        if polygon.unsigned_area() == 0.0 {
            return Err(GeometryError::Invalid {
                reason: "polygon has zero area".to_string(),
            });
        }

        Ok(Self { polygon })
    }

    /// The validated planar polygon, in lon/lat degrees.
    #[must_use]
    pub const fn as_polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Exterior ring positions as `[lon, lat]` pairs, closed (first == last).
    #[must_use]
    pub fn exterior_positions(&self) -> Vec<Vec<f64>> {
        self.polygon
            .exterior()
            .coords()
            .map(|coord| vec![coord.x, coord.y])
            .collect()
    }

    /// GeoJSON geometry object for this boundary.
    #[must_use]
    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Polygon(vec![self.exterior_positions()]))
    }
}

impl Serialize for Boundary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_geojson().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Boundary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let geometry = geojson::Geometry::deserialize(deserializer)?;

        Self::from_geometry(geometry).map_err(serde::de::Error::custom)
    }
}

fn value_type_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

///
/// TESTS
///
