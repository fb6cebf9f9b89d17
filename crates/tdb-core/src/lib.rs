//! Characterization data model and working point resolution for tdb.
//!
//! This crate provides:
//! - Validated curve datasets and per-element dataset collections
//! - Nearest-dataset lookup across temperature, gate and supply voltage
//! - Local linearization of channel curves and curve read-out
//! - The error and warning types shared by the other tdb crates

pub mod collection;
pub mod conditions;
pub mod curve;
pub mod error;
pub mod linear;
pub mod resolve;
pub mod warning;

pub use collection::{DatasetCollection, ElementRole};
pub use conditions::{MatchTarget, MatchWeights, MeasuredConditions, OperatingConditions};
pub use curve::{Axes, CurveDataset, CurveKind};
pub use error::{Error, Result};
pub use linear::{Interpolated, LinearChannel, interpolate, linearize};
pub use resolve::{MatchScore, find_best_match};
pub use warning::OutOfRangeWarning;
