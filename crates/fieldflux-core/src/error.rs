use crate::types::{FarmerId, FieldId};
use fieldflux_geo::GeometryError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Every failure the executors can surface. All variants are typed
/// outcomes: nothing is swallowed, truncated, or defaulted on the way to
/// the boundary layer, which maps `class()` to user-visible responses.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("farmer not found: {0}")]
    FarmerNotFound(FarmerId),

    #[error("field not found: {0}")]
    FieldNotFound(FieldId),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),

    #[error("polygon overlaps existing field '{name}'")]
    OverlappingField { name: String },

    /// Reserved for deployments that delegate projection or validation to
    /// an external geometry service; the in-process pipeline never emits it.
    #[error("geometry service unavailable: {message}")]
    GeometryServiceUnavailable { message: String },

    #[error("store invariant violation: {message}")]
    StoreInvariant { message: String },
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::FarmerNotFound(_) | Self::FieldNotFound(_) => ErrorClass::NotFound,
            Self::InvalidGeometry(_) => ErrorClass::InvalidInput,
            Self::OverlappingField { .. } => ErrorClass::Conflict,
            Self::GeometryServiceUnavailable { .. } => ErrorClass::Unavailable,
            Self::StoreInvariant { .. } => ErrorClass::Internal,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::FarmerNotFound(_) => ErrorOrigin::Farmer,
            Self::FieldNotFound(_) | Self::OverlappingField { .. } => ErrorOrigin::Field,
            Self::InvalidGeometry(_) | Self::GeometryServiceUnavailable { .. } => {
                ErrorOrigin::Geometry
            }
            Self::StoreInvariant { .. } => ErrorOrigin::Store,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class(), ErrorClass::NotFound)
    }

    /// Only transient failures are worth retrying; everything else needs
    /// the caller to change its input first.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.class(), ErrorClass::Unavailable)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {self}", self.origin(), self.class())
    }
}

///
/// ErrorClass
/// Runtime classification used by boundary layers for status mapping.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    NotFound,
    InvalidInput,
    Conflict,
    Unavailable,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::InvalidInput => "invalid_input",
            Self::Conflict => "conflict",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Which subsystem produced the failure.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Geometry,
    Farmer,
    Field,
    Store,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Geometry => "geometry",
            Self::Farmer => "farmer",
            Self::Field => "field",
            Self::Store => "store",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
