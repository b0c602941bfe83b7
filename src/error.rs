//! Error types for geoveil.
//!
//! The map pipeline itself degrades instead of failing: rejected records and
//! bounds are dropped with a diagnostic. These errors surface from the
//! validation helpers and from configuration loading.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeoveilError>;

#[derive(Debug, Error)]
pub enum GeoveilError {
    /// A record's latitude or longitude is missing, non-finite or out of range.
    #[error("Invalid coordinate for record '{id}': {reason}")]
    InvalidCoordinate { id: String, reason: String },

    #[error("Invalid bounding box: {0}")]
    InvalidBounds(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Geohash error: {0}")]
    Geohash(#[from] geohash::GeohashError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[cfg(feature = "toml")]
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
