//! Error types for tdb-devices.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Lookup, linearization or dataset validation failure.
    #[error(transparent)]
    Core(#[from] tdb_core::Error),

    /// Element or transistor metadata is inconsistent.
    #[error("invalid device: {0}")]
    InvalidDevice(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true when the underlying cause is missing characterization data.
    pub fn is_missing_data(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_missing_data())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
