//! Error types for tdb-core.

use thiserror::Error;

use crate::collection::ElementRole;
use crate::curve::CurveKind;

#[derive(Debug, Error)]
pub enum Error {
    /// A collection (or standalone curve) needed by the operation is empty or absent.
    #[error("missing data: no {kind} datasets for {role}")]
    MissingData { role: ElementRole, kind: CurveKind },

    /// A dataset violates a structural invariant.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// Invalid match weights or operating conditions.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Returns true for [`Error::MissingData`], which callers may recover from.
    pub fn is_missing_data(&self) -> bool {
        matches!(self, Error::MissingData { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
