//! Non-fatal signals attached to results computed outside the measured envelope.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collection::ElementRole;
use crate::curve::CurveKind;

/// A result was computed but is less trustworthy than usual.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutOfRangeWarning {
    /// The evaluation point lies outside the sampled x range; the boundary
    /// segment was extended.
    Extrapolated {
        kind: CurveKind,
        target: f64,
        min: f64,
        max: f64,
    },
    /// The requested junction temperature exceeds the element's rating.
    AboveThermalLimit {
        role: ElementRole,
        t_j: f64,
        t_j_max: f64,
    },
}

impl fmt::Display for OutOfRangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutOfRangeWarning::Extrapolated {
                kind,
                target,
                min,
                max,
            } => write!(
                f,
                "{kind} curve extrapolated at {target} (sampled range [{min}, {max}])"
            ),
            OutOfRangeWarning::AboveThermalLimit { role, t_j, t_j_max } => write!(
                f,
                "{role} junction temperature {t_j}°C exceeds t_j_max {t_j_max}°C"
            ),
        }
    }
}
