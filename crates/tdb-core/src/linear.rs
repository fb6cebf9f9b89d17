//! Local linear models of tabulated curves.
//!
//! A channel curve is replaced around the working current by the straight
//! line through its bracketing samples:
//!
//! ```text
//! v(i) = v_channel + r_channel * i
//! ```
//!
//! Currents outside the sampled range use the boundary segment and carry an
//! [`OutOfRangeWarning::Extrapolated`] signal instead of failing.

use serde::{Deserialize, Serialize};

use crate::curve::{Axes, CurveDataset, CurveKind};
use crate::error::{Error, Result};
use crate::warning::OutOfRangeWarning;

/// Linearized channel: offset voltage plus ohmic slope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearChannel {
    /// Voltage offset at zero current (V).
    pub v_channel: f64,
    /// Differential channel resistance (Ω).
    pub r_channel: f64,
    /// Set when the working current lies outside the sampled range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<OutOfRangeWarning>,
}

impl LinearChannel {
    /// Channel voltage predicted at `i_channel`.
    pub fn voltage_at(&self, i_channel: f64) -> f64 {
        self.v_channel + self.r_channel * i_channel
    }

    /// Conduction power `v·i` at `i_channel` (W).
    pub fn conduction_power(&self, i_channel: f64) -> f64 {
        self.voltage_at(i_channel) * i_channel
    }
}

/// A curve value read out at one x position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolated {
    pub value: f64,
    pub warning: Option<OutOfRangeWarning>,
}

/// Linearize a channel curve around `i_target`.
///
/// `CurrentVoltage` curves are bracketed directly. `VoltageCurrent` curves
/// keep their voltage ordering and are bracketed on segments where the
/// current rises; flat or falling stretches (a diode below its knee, noise
/// in digitized data) are skipped.
pub fn linearize(curve: &CurveDataset, i_target: f64) -> Result<LinearChannel> {
    if curve.kind() != CurveKind::Channel {
        return Err(Error::InvalidDataset(format!(
            "cannot linearize a {} curve as a channel",
            curve.kind()
        )));
    }
    if !i_target.is_finite() {
        return Err(Error::InvalidConfig(format!(
            "non-finite channel current: {i_target}"
        )));
    }

    let (segment, range) = match curve.axes() {
        Axes::CurrentVoltage => (Segment::bracket(curve.points(), i_target)?, curve.x_range()),
        Axes::VoltageCurrent => rising_segment(curve, i_target)?,
        other => {
            return Err(Error::InvalidDataset(format!(
                "channel curve cannot use {other:?} axes"
            )));
        }
    };
    let r_channel = segment.slope();
    let v_channel = segment.y0 - r_channel * segment.x0;

    let warning = extrapolation(CurveKind::Channel, i_target, range);
    if let Some(w) = &warning {
        log::warn!("{w}");
    }

    Ok(LinearChannel {
        v_channel,
        r_channel,
        warning,
    })
}

/// Evaluate `curve` at `x` along its own axes, extending the boundary
/// segments outside the sampled range.
pub fn interpolate(curve: &CurveDataset, x: f64) -> Result<Interpolated> {
    if !x.is_finite() {
        return Err(Error::InvalidConfig(format!(
            "non-finite evaluation point: {x}"
        )));
    }

    let points = curve.points();
    let segment = Segment::bracket(points, x)?;
    let value = segment.y0 + segment.slope() * (x - segment.x0);

    let warning = extrapolation(curve.kind(), x, curve.x_range());
    if let Some(w) = &warning {
        log::warn!("{w}");
    }

    Ok(Interpolated { value, warning })
}

/// Pick the (current, voltage) segment of a `VoltageCurrent` curve that
/// covers `i_target`, together with the covered current range.
///
/// Only segments with rising current are considered. When none covers the
/// target, the one closest in current is used.
fn rising_segment(curve: &CurveDataset, i_target: f64) -> Result<(Segment, (f64, f64))> {
    let rising: Vec<Segment> = curve
        .points()
        .windows(2)
        .filter(|w| w[1].1 > w[0].1)
        .map(|w| Segment {
            x0: w[0].1,
            y0: w[0].0,
            x1: w[1].1,
            y1: w[1].0,
        })
        .collect();

    let min = rising.iter().map(|s| s.x0).min_by(f64::total_cmp);
    let max = rising.iter().map(|s| s.x1).max_by(f64::total_cmp);
    let (Some(min), Some(max)) = (min, max) else {
        return Err(Error::InvalidDataset(format!(
            "channel curve at {}: current never rises",
            curve.conditions()
        )));
    };

    let segment = rising
        .iter()
        .find(|s| s.x0 <= i_target && i_target <= s.x1)
        .or_else(|| {
            rising
                .iter()
                .min_by(|a, b| a.gap(i_target).total_cmp(&b.gap(i_target)))
        })
        .copied()
        .ok_or_else(|| Error::InvalidDataset("channel curve has no segments".to_string()))?;

    Ok((segment, (min, max)))
}

/// The two samples used for a local linear model.
#[derive(Debug, Clone, Copy)]
struct Segment {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Segment {
    /// Segment `[x_k, x_{k+1}]` with `x_k <= x < x_{k+1}`, clamped to the
    /// first or last segment outside the sampled range.
    fn bracket(points: &[(f64, f64)], x: f64) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::InvalidDataset(format!(
                "curve has {} point(s), need at least 2",
                points.len()
            )));
        }

        let upper = points.partition_point(|&(px, _)| px <= x);
        let lo = upper.saturating_sub(1).min(points.len() - 2);
        let (x0, y0) = points[lo];
        let (x1, y1) = points[lo + 1];
        Ok(Self { x0, y0, x1, y1 })
    }

    fn slope(&self) -> f64 {
        (self.y1 - self.y0) / (self.x1 - self.x0)
    }

    /// Distance from `x` to the segment's x interval.
    fn gap(&self, x: f64) -> f64 {
        if x < self.x0 {
            self.x0 - x
        } else {
            (x - self.x1).max(0.0)
        }
    }
}

fn extrapolation(kind: CurveKind, x: f64, (min, max): (f64, f64)) -> Option<OutOfRangeWarning> {
    (x < min || x > max).then_some(OutOfRangeWarning::Extrapolated {
        kind,
        target: x,
        min,
        max,
    })
}
