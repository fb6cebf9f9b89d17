//! Measurement and operating conditions, and the weights used to compare them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Conditions a curve was measured under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasuredConditions {
    /// Junction temperature (°C).
    pub t_j: f64,
    /// Gate voltage (V). `None` for elements without a gate (e.g. an IGBT's freewheeling diode).
    #[serde(default)]
    pub v_g: Option<f64>,
    /// Supply voltage (V). Energy datasets only.
    #[serde(default)]
    pub v_supply: Option<f64>,
}

impl MeasuredConditions {
    pub fn new(t_j: f64, v_g: Option<f64>) -> Self {
        Self {
            t_j,
            v_g,
            v_supply: None,
        }
    }

    pub fn with_v_supply(mut self, v_supply: f64) -> Self {
        self.v_supply = Some(v_supply);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let finite = self.t_j.is_finite()
            && self.v_g.is_none_or(f64::is_finite)
            && self.v_supply.is_none_or(f64::is_finite);
        if finite {
            Ok(())
        } else {
            Err(Error::InvalidDataset(format!(
                "non-finite measurement conditions: {self}"
            )))
        }
    }
}

impl fmt::Display for MeasuredConditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t_j={}°C", self.t_j)?;
        if let Some(v_g) = self.v_g {
            write!(f, ", v_g={v_g}V")?;
        }
        if let Some(v_supply) = self.v_supply {
            write!(f, ", v_supply={v_supply}V")?;
        }
        Ok(())
    }
}

/// Target conditions for a dataset lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchTarget {
    /// Junction temperature (°C).
    pub t_j: f64,
    /// Gate voltage (V).
    pub v_g: f64,
    /// Supply voltage (V). Only compared against energy datasets.
    #[serde(default)]
    pub v_supply: Option<f64>,
}

impl MatchTarget {
    pub fn new(t_j: f64, v_g: f64) -> Self {
        Self {
            t_j,
            v_g,
            v_supply: None,
        }
    }

    pub fn with_v_supply(mut self, v_supply: f64) -> Self {
        self.v_supply = Some(v_supply);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.t_j.is_finite() && self.v_g.is_finite() && self.v_supply.is_none_or(f64::is_finite)
        {
            Ok(())
        } else {
            Err(Error::InvalidConfig(format!(
                "non-finite match target: t_j={}, v_g={}, v_supply={:?}",
                self.t_j, self.v_g, self.v_supply
            )))
        }
    }
}

/// Conditions at which electrical parameters are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingConditions {
    /// Junction temperature (°C).
    pub t_j: f64,
    /// Gate voltage (V).
    pub v_g: f64,
    /// Channel (load) current (A).
    pub i_channel: f64,
    /// Supply voltage (V) used to pick switching energy data. `None` ignores it.
    #[serde(default)]
    pub v_supply: Option<f64>,
}

impl OperatingConditions {
    pub fn new(t_j: f64, v_g: f64, i_channel: f64) -> Self {
        Self {
            t_j,
            v_g,
            i_channel,
            v_supply: None,
        }
    }

    pub fn with_v_supply(mut self, v_supply: f64) -> Self {
        self.v_supply = Some(v_supply);
        self
    }

    /// The dataset lookup part of these conditions.
    pub fn target(&self) -> MatchTarget {
        MatchTarget {
            t_j: self.t_j,
            v_g: self.v_g,
            v_supply: self.v_supply,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.target().validate()?;
        if !self.i_channel.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "non-finite channel current: {}",
                self.i_channel
            )));
        }
        Ok(())
    }
}

/// Weights that put temperature and voltage differences on one scale.
///
/// `temperature_voltage` is the temperature difference (°C) that counts the
/// same as a 1 V difference. It belongs to a device family and has no default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatchWeightsRecord")]
pub struct MatchWeights {
    temperature_voltage: f64,
}

#[derive(Debug, Deserialize)]
struct MatchWeightsRecord {
    temperature_voltage: f64,
}

impl TryFrom<MatchWeightsRecord> for MatchWeights {
    type Error = Error;

    fn try_from(record: MatchWeightsRecord) -> Result<Self> {
        MatchWeights::new(record.temperature_voltage)
    }
}

impl MatchWeights {
    /// Create weights; `temperature_voltage` must be finite and positive.
    pub fn new(temperature_voltage: f64) -> Result<Self> {
        if temperature_voltage.is_finite() && temperature_voltage > 0.0 {
            Ok(Self {
                temperature_voltage,
            })
        } else {
            Err(Error::InvalidConfig(format!(
                "temperature/voltage weight must be finite and positive, got {temperature_voltage}"
            )))
        }
    }

    pub fn temperature_voltage(&self) -> f64 {
        self.temperature_voltage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_must_be_positive() {
        assert!(MatchWeights::new(10.0).is_ok());
        assert!(matches!(
            MatchWeights::new(0.0),
            Err(Error::InvalidConfig(_))
        ));
        assert!(MatchWeights::new(-1.0).is_err());
        assert!(MatchWeights::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_weights_deserialize() {
        let w: MatchWeights = serde_json::from_str(r#"{"temperature_voltage": 10.0}"#).unwrap();
        assert_eq!(w.temperature_voltage(), 10.0);
        assert!(serde_json::from_str::<MatchWeights>(r#"{"temperature_voltage": 0.0}"#).is_err());
    }

    #[test]
    fn test_operating_conditions_target() {
        let op = OperatingConditions::new(125.0, 15.0, 50.0).with_v_supply(600.0);
        let target = op.target();
        assert_eq!(target.t_j, 125.0);
        assert_eq!(target.v_g, 15.0);
        assert_eq!(target.v_supply, Some(600.0));
        assert!(op.validate().is_ok());
        assert!(OperatingConditions::new(125.0, 15.0, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_measured_conditions_display() {
        let c = MeasuredConditions::new(25.0, Some(15.0)).with_v_supply(600.0);
        assert_eq!(c.to_string(), "t_j=25°C, v_g=15V, v_supply=600V");
        assert_eq!(MeasuredConditions::new(150.0, None).to_string(), "t_j=150°C");
    }
}
