use bacsim_core::types::{ErrorClass, ErrorCode, ObjectId, PropertyId};
use std::path::PathBuf;
use thiserror::Error;

/// Startup failures. Any of these aborts the process before the device
/// starts answering requests.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
}

/// Catalogue lookups and mutations.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CatalogueError {
    #[error("unknown object {0}")]
    UnknownObject(ObjectId),
    #[error("{0} has no present-value")]
    NotAPoint(ObjectId),
    #[error("non-finite present-value {value} for {object_id}")]
    NonFinite { object_id: ObjectId, value: f32 },
    #[error("duplicate object {0}")]
    DuplicateObject(ObjectId),
    #[error("object type of {0} cannot be simulated")]
    UnsupportedObjectType(ObjectId),
}

/// Array-index failures from the property resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("{property_id} is not an array")]
    NotAnArray { property_id: PropertyId },
    #[error("index {index} out of range for {property_id} (length {len})")]
    InvalidArrayIndex {
        property_id: PropertyId,
        index: u32,
        len: usize,
    },
}

/// Protocol error class/code pair a per-request failure maps to.
pub trait ServiceFailure {
    fn error_pair(&self) -> (ErrorClass, ErrorCode);
}

impl ServiceFailure for CatalogueError {
    fn error_pair(&self) -> (ErrorClass, ErrorCode) {
        match self {
            Self::UnknownObject(_) => (ErrorClass::Object, ErrorCode::UnknownObject),
            Self::NotAPoint(_) => (ErrorClass::Property, ErrorCode::WriteAccessDenied),
            Self::NonFinite { .. } => (ErrorClass::Property, ErrorCode::ValueOutOfRange),
            Self::DuplicateObject(_) => (ErrorClass::Object, ErrorCode::Other),
            Self::UnsupportedObjectType(_) => (ErrorClass::Object, ErrorCode::Other),
        }
    }
}

impl ServiceFailure for PropertyError {
    fn error_pair(&self) -> (ErrorClass, ErrorCode) {
        match self {
            Self::NotAnArray { .. } => (ErrorClass::Property, ErrorCode::PropertyIsNotAnArray),
            Self::InvalidArrayIndex { .. } => (ErrorClass::Property, ErrorCode::InvalidArrayIndex),
        }
    }
}

/// Failures reading or publishing an external feed snapshot. The relay
/// treats all of them as "no snapshot this tick".
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("feed snapshot is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("feed snapshot must be a json object")]
    NotAnObject,
}
