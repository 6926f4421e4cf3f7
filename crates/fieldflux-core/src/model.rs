use crate::types::{FarmerId, FieldId, HistoryId, Timestamp};
use fieldflux_geo::Boundary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name applied when a field is created without one.
pub const DEFAULT_FIELD_NAME: &str = "New Field";

/// Name applied when a farmer is created without one.
pub const DEFAULT_FARMER_NAME: &str = "Unnamed Farmer";

///
/// Farmer
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Farmer {
    pub id: FarmerId,
    pub name: String,
    pub contact: String,
}

///
/// FarmerDraft
/// Caller-supplied farmer attributes; omitted values fall back to
/// defaults on create and to the stored values on update.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerDraft {
    pub name: Option<String>,
    pub contact: Option<String>,
}

impl FarmerDraft {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            contact: None,
        }
    }

    #[must_use]
    pub fn contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }
}

///
/// Field
///
/// `acres` is derived from `boundary` on every mutation and is never
/// settable by callers.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    pub farmer_id: FarmerId,
    pub name: String,
    pub notes: String,
    #[serde(rename = "geometry")]
    pub boundary: Boundary,
    pub acres: f64,
}

///
/// FieldDraft
/// Caller-supplied field attributes. Geometry is raw GeoJSON exactly as
/// received at the boundary; normalization happens inside the pipeline.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDraft {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub geometry: Option<serde_json::Value>,
}

impl FieldDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn geometry(mut self, geometry: serde_json::Value) -> Self {
        self.geometry = Some(geometry);
        self
    }
}

/// Trimmed name, or the fallback when the input is omitted or blank.
pub(crate) fn sanitized_name(input: Option<&str>, fallback: &str) -> String {
    input
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map_or_else(|| fallback.to_string(), ToString::to_string)
}

///
/// HistoryAction
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        };
        write!(f, "{label}")
    }
}

///
/// HistoryEntry
///
/// Immutable audit record for one field mutation. Never mutated or
/// removed once written.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: HistoryId,
    pub field_id: FieldId,
    pub action: HistoryAction,
    pub timestamp: Timestamp,
    pub payload: serde_json::Value,
}

///
/// FarmerSummary
/// Aggregate view over a farmer's field set.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerSummary {
    pub farmer: Farmer,
    pub field_count: usize,
    pub total_acres: f64,
}

///
/// TESTS
///
