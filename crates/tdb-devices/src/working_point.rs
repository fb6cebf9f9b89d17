//! Resolved working point of a transistor.
//!
//! A [`WorkingPoint`] is built in one piece from both elements and only then
//! handed to the transistor, so a failed resolution never leaves a partially
//! updated value behind.

use serde::{Deserialize, Serialize};
use tdb_core::{MatchWeights, MeasuredConditions, OperatingConditions, OutOfRangeWarning};

use crate::element::{ChannelResolution, CharacterizedElement, SwitchingEnergies};
use crate::error::Result;

/// Conditions requested for each element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkingPointRequest {
    pub switch: OperatingConditions,
    pub diode: OperatingConditions,
}

impl WorkingPointRequest {
    /// Same temperature, gate voltage and current for switch and diode.
    pub fn uniform(t_j: f64, v_g: f64, i_channel: f64) -> Self {
        let conditions = OperatingConditions::new(t_j, v_g, i_channel);
        Self {
            switch: conditions,
            diode: conditions,
        }
    }

    pub fn new(switch: OperatingConditions, diode: OperatingConditions) -> Self {
        Self { switch, diode }
    }
}

/// Linearized channel of one element at its requested conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementOperatingPoint {
    /// Requested conditions.
    pub conditions: OperatingConditions,
    /// Conditions of the channel curve that was used.
    pub dataset: MeasuredConditions,
    /// Channel voltage offset (V).
    pub v_channel: f64,
    /// Channel resistance (Ω).
    pub r_channel: f64,
}

impl ElementOperatingPoint {
    fn from_resolution(conditions: OperatingConditions, r: &ChannelResolution<'_>) -> Self {
        Self {
            conditions,
            dataset: r.dataset.conditions(),
            v_channel: r.linear.v_channel,
            r_channel: r.linear.r_channel,
        }
    }

    /// Channel voltage at the requested current (V).
    pub fn v_at_i_channel(&self) -> f64 {
        self.v_channel + self.r_channel * self.conditions.i_channel
    }
}

/// A fully populated working point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingPoint {
    switch: ElementOperatingPoint,
    diode: ElementOperatingPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    energies: Option<SwitchingEnergies>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<OutOfRangeWarning>,
}

impl WorkingPoint {
    /// Resolve both elements at the requested conditions.
    ///
    /// Switching energies are read out when the switch carries both turn-on
    /// and turn-off data, and left empty otherwise.
    pub fn resolve(
        switch: &CharacterizedElement,
        diode: &CharacterizedElement,
        request: &WorkingPointRequest,
        weights: &MatchWeights,
    ) -> Result<Self> {
        let s = switch.resolve_channel(&request.switch, weights)?;
        let d = diode.resolve_channel(&request.diode, weights)?;

        let mut warnings: Vec<OutOfRangeWarning> = s.warnings().chain(d.warnings()).collect();

        let energies = if switch.has_energy_data() {
            let (energies, energy_warnings) = switch.switching_energies(&request.switch, weights)?;
            warnings.extend(energy_warnings);
            Some(energies)
        } else {
            log::debug!("switch has no switching energy data; skipping e_on/e_off");
            None
        };

        Ok(Self {
            switch: ElementOperatingPoint::from_resolution(request.switch, &s),
            diode: ElementOperatingPoint::from_resolution(request.diode, &d),
            energies,
            warnings,
        })
    }

    pub fn switch(&self) -> &ElementOperatingPoint {
        &self.switch
    }

    pub fn diode(&self) -> &ElementOperatingPoint {
        &self.diode
    }

    /// Switch junction temperature (°C).
    pub fn t_j(&self) -> f64 {
        self.switch.conditions.t_j
    }

    /// Switch gate voltage (V).
    pub fn v_g(&self) -> f64 {
        self.switch.conditions.v_g
    }

    /// Switch channel current (A).
    pub fn i_channel(&self) -> f64 {
        self.switch.conditions.i_channel
    }

    pub fn switch_v_channel(&self) -> f64 {
        self.switch.v_channel
    }

    pub fn switch_r_channel(&self) -> f64 {
        self.switch.r_channel
    }

    pub fn diode_v_channel(&self) -> f64 {
        self.diode.v_channel
    }

    pub fn diode_r_channel(&self) -> f64 {
        self.diode.r_channel
    }

    pub fn energies(&self) -> Option<&SwitchingEnergies> {
        self.energies.as_ref()
    }

    /// Turn-on energy at the working current (J), if energy data exists.
    pub fn e_on(&self) -> Option<f64> {
        self.energies.map(|e| e.e_on)
    }

    /// Turn-off energy at the working current (J), if energy data exists.
    pub fn e_off(&self) -> Option<f64> {
        self.energies.map(|e| e.e_off)
    }

    /// All degraded-accuracy signals raised while resolving.
    pub fn warnings(&self) -> &[OutOfRangeWarning] {
        &self.warnings
    }

    /// Some requested temperature exceeds an element's `t_j_max`.
    pub fn is_out_of_spec(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, OutOfRangeWarning::AboveThermalLimit { .. }))
    }

    /// Any warning was raised.
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}
