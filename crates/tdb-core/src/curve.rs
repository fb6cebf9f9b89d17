//! Tabulated characteristic curves and the conditions they were measured under.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::conditions::MeasuredConditions;
use crate::error::{Error, Result};

/// Measurement kind of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// Conduction characteristic (V-I).
    Channel,
    /// Turn-on switching energy vs load current.
    EOn,
    /// Turn-off switching energy vs load current.
    EOff,
    /// Output capacitance vs blocking voltage.
    Coss,
}

impl CurveKind {
    /// Whether `axes` is a valid orientation for this kind of curve.
    pub fn accepts(self, axes: Axes) -> bool {
        match self {
            CurveKind::Channel => matches!(axes, Axes::VoltageCurrent | Axes::CurrentVoltage),
            CurveKind::EOn | CurveKind::EOff => axes == Axes::CurrentEnergy,
            CurveKind::Coss => axes == Axes::VoltageCapacitance,
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CurveKind::Channel => "channel",
            CurveKind::EOn => "e_on",
            CurveKind::EOff => "e_off",
            CurveKind::Coss => "c_oss",
        };
        f.write_str(name)
    }
}

/// Physical quantities on the (x, y) axes of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axes {
    /// x = voltage (V), y = current (A). Datasheet output characteristic.
    VoltageCurrent,
    /// x = current (A), y = voltage (V).
    CurrentVoltage,
    /// x = current (A), y = energy (J).
    CurrentEnergy,
    /// x = voltage (V), y = capacitance (F).
    VoltageCapacitance,
}

/// An immutable tabulated characteristic.
///
/// Construction checks that there are at least two samples, every value is
/// finite and x is strictly increasing. Deserialization goes through the same
/// checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveRecord")]
pub struct CurveDataset {
    kind: CurveKind,
    axes: Axes,
    t_j: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    v_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    v_supply: Option<f64>,
    points: Vec<(f64, f64)>,
}

/// Unvalidated wire shape of [`CurveDataset`].
#[derive(Debug, Deserialize)]
struct CurveRecord {
    kind: CurveKind,
    axes: Axes,
    t_j: f64,
    #[serde(default)]
    v_g: Option<f64>,
    #[serde(default)]
    v_supply: Option<f64>,
    points: Vec<(f64, f64)>,
}

impl TryFrom<CurveRecord> for CurveDataset {
    type Error = Error;

    fn try_from(record: CurveRecord) -> Result<Self> {
        CurveDataset::new(
            record.kind,
            record.axes,
            MeasuredConditions {
                t_j: record.t_j,
                v_g: record.v_g,
                v_supply: record.v_supply,
            },
            record.points,
        )
    }
}

impl CurveDataset {
    /// Create a validated dataset.
    pub fn new(
        kind: CurveKind,
        axes: Axes,
        conditions: MeasuredConditions,
        points: Vec<(f64, f64)>,
    ) -> Result<Self> {
        if !kind.accepts(axes) {
            return Err(Error::InvalidDataset(format!(
                "{kind} curve cannot use {axes:?} axes"
            )));
        }
        conditions.validate()?;
        if kind == CurveKind::Channel && conditions.v_supply.is_some() {
            return Err(Error::InvalidDataset(
                "channel curves carry no supply voltage".to_string(),
            ));
        }
        validate_points(kind, conditions.t_j, &points)?;

        Ok(Self {
            kind,
            axes,
            t_j: conditions.t_j,
            v_g: conditions.v_g,
            v_supply: conditions.v_supply,
            points,
        })
    }

    /// Channel curve sampled as (voltage, current) pairs.
    pub fn channel_v_i(t_j: f64, v_g: Option<f64>, points: Vec<(f64, f64)>) -> Result<Self> {
        Self::new(
            CurveKind::Channel,
            Axes::VoltageCurrent,
            MeasuredConditions::new(t_j, v_g),
            points,
        )
    }

    /// Channel curve sampled as (current, voltage) pairs.
    pub fn channel_i_v(t_j: f64, v_g: Option<f64>, points: Vec<(f64, f64)>) -> Result<Self> {
        Self::new(
            CurveKind::Channel,
            Axes::CurrentVoltage,
            MeasuredConditions::new(t_j, v_g),
            points,
        )
    }

    /// Switching energy curve sampled as (current, energy) pairs.
    pub fn energy(
        kind: CurveKind,
        t_j: f64,
        v_g: Option<f64>,
        v_supply: f64,
        points: Vec<(f64, f64)>,
    ) -> Result<Self> {
        Self::new(
            kind,
            Axes::CurrentEnergy,
            MeasuredConditions::new(t_j, v_g).with_v_supply(v_supply),
            points,
        )
    }

    /// Output capacitance curve sampled as (voltage, capacitance) pairs.
    pub fn c_oss(t_j: f64, points: Vec<(f64, f64)>) -> Result<Self> {
        Self::new(
            CurveKind::Coss,
            Axes::VoltageCapacitance,
            MeasuredConditions::new(t_j, None),
            points,
        )
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    pub fn axes(&self) -> Axes {
        self.axes
    }

    /// Junction temperature (°C).
    pub fn t_j(&self) -> f64 {
        self.t_j
    }

    /// Gate voltage (V), if the measurement specifies one.
    pub fn v_g(&self) -> Option<f64> {
        self.v_g
    }

    /// Supply voltage (V), energy datasets only.
    pub fn v_supply(&self) -> Option<f64> {
        self.v_supply
    }

    pub fn conditions(&self) -> MeasuredConditions {
        MeasuredConditions {
            t_j: self.t_j,
            v_g: self.v_g,
            v_supply: self.v_supply,
        }
    }

    /// Samples in increasing x order.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed dataset.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sampled x range `(min, max)`.
    pub fn x_range(&self) -> (f64, f64) {
        let first = self.points.first().map_or(0.0, |p| p.0);
        let last = self.points.last().map_or(0.0, |p| p.0);
        (first, last)
    }
}

fn validate_points(kind: CurveKind, t_j: f64, points: &[(f64, f64)]) -> Result<()> {
    if points.len() < 2 {
        return Err(Error::InvalidDataset(format!(
            "{kind} curve at t_j={t_j} has {} point(s), need at least 2",
            points.len()
        )));
    }
    if let Some(idx) = points
        .iter()
        .position(|(x, y)| !x.is_finite() || !y.is_finite())
    {
        return Err(Error::InvalidDataset(format!(
            "{kind} curve at t_j={t_j} has a non-finite sample at index {idx}"
        )));
    }
    if let Some(idx) = points.windows(2).position(|w| w[1].0 <= w[0].0) {
        return Err(Error::InvalidDataset(format!(
            "{kind} curve at t_j={t_j}: x is not strictly increasing at index {}",
            idx + 1
        )));
    }
    Ok(())
}
