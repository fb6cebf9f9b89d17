//! # tdb
//!
//! Power semiconductor characterization data and working point engine.
//!
//! tdb provides:
//! - Validated curve datasets (channel, switching energy, output capacitance)
//! - Nearest-dataset lookup across junction temperature, gate and supply voltage
//! - Channel linearization into resistance and voltage offset
//! - Transistors with a working point that is resolved in one piece
//!
//! ## Quick Start
//!
//! ```rust
//! use tdb::prelude::*;
//!
//! let switch_channel = DatasetCollection::new(
//!     ElementRole::Switch,
//!     CurveKind::Channel,
//!     vec![
//!         CurveDataset::channel_i_v(25.0, Some(15.0), vec![(0.0, 0.0), (10.0, 1.0), (20.0, 3.0)])?,
//!         CurveDataset::channel_i_v(150.0, Some(15.0), vec![(0.0, 0.0), (10.0, 1.5), (20.0, 4.0)])?,
//!     ],
//! )?;
//! let diode_channel = DatasetCollection::new(
//!     ElementRole::Diode,
//!     CurveKind::Channel,
//!     vec![CurveDataset::channel_i_v(25.0, None, vec![(0.0, 0.8), (20.0, 1.8)])?],
//! )?;
//!
//! let switch = CharacterizedElement::switch(
//!     175.0,
//!     switch_channel,
//!     DatasetCollection::empty(ElementRole::Switch, CurveKind::EOn),
//!     DatasetCollection::empty(ElementRole::Switch, CurveKind::EOff),
//! )?;
//! let diode = CharacterizedElement::diode(175.0, diode_channel)?;
//!
//! let info = TransistorInfo {
//!     name: "example".to_string(),
//!     manufacturer: "example".to_string(),
//!     technology: Technology::SicMosfet,
//!     ratings: Ratings { v_abs_max: 1200.0, i_abs_max: 40.0, i_cont: 15.0 },
//! };
//! let mut transistor = Transistor::new(info, switch, diode, MatchWeights::new(10.0)?)?;
//!
//! // 100 °C is closer to 150 °C (distance 5.0) than to 25 °C (7.5).
//! let wp = transistor.update_wp(100.0, 15.0, 15.0)?;
//! assert_eq!(wp.switch().dataset.t_j, 150.0);
//! assert!((wp.switch_r_channel() - 0.25).abs() < 1e-12);
//! # Ok::<(), tdb::DeviceError>(())
//! ```

pub use tdb_core as core;
pub use tdb_devices as devices;

// ============================================================================
// Convenient re-exports from tdb_core
// ============================================================================

pub use tdb_core::{
    Axes,
    // Data model
    CurveDataset,
    CurveKind,
    DatasetCollection,
    ElementRole,
    // Errors and warnings
    Error as CoreError,
    Interpolated,
    LinearChannel,
    // Conditions
    MatchScore,
    MatchTarget,
    MatchWeights,
    MeasuredConditions,
    OperatingConditions,
    OutOfRangeWarning,
    // Lookup and linearization
    find_best_match,
    interpolate,
    linearize,
};

// ============================================================================
// Convenient re-exports from tdb_devices
// ============================================================================

pub use tdb_devices::{
    CharacterizedElement,
    DatasetCounts,
    ElementOperatingPoint,
    // Errors
    Error as DeviceError,
    MatchedSet,
    Ratings,
    SwitchingEnergies,
    Technology,
    Transistor,
    TransistorInfo,
    WorkingPoint,
    WorkingPointRequest,
};

/// Prelude module for convenient imports.
///
/// ```rust
/// use tdb::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Axes, CharacterizedElement, CoreError, CurveDataset, CurveKind, DatasetCollection,
        DeviceError, ElementRole, LinearChannel, MatchTarget, MatchWeights, OperatingConditions,
        OutOfRangeWarning, Ratings, Technology, Transistor, TransistorInfo, WorkingPoint,
        WorkingPointRequest, find_best_match, linearize,
    };
}
