//! Characterized devices for tdb.
//!
//! This crate provides:
//! - Switch and diode elements built from validated dataset collections
//! - Transistors with ratings, output capacitance and a working point
//! - Working point resolution (quickstart and explicit conditions)
//! - Output capacitance energy and charge integration

pub mod capacitance;
pub mod element;
pub mod error;
pub mod transistor;
pub mod working_point;

pub use element::{
    ChannelResolution, CharacterizedElement, DatasetCounts, MatchedSet, SwitchingEnergies,
};
pub use error::{Error, Result};
pub use transistor::{Ratings, Technology, Transistor, TransistorInfo};
pub use working_point::{ElementOperatingPoint, WorkingPoint, WorkingPointRequest};
