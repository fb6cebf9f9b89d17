//! Transistor: a switch, a diode, package ratings and the working point.

use std::fmt;

use serde::{Deserialize, Serialize};
use tdb_core::{
    CurveDataset, CurveKind, ElementRole, LinearChannel, MatchTarget, MatchWeights,
    OperatingConditions,
};

use crate::capacitance;
use crate::element::{CharacterizedElement, MatchedSet};
use crate::error::{Error, Result};
use crate::working_point::{WorkingPoint, WorkingPointRequest};

/// Semiconductor technology of a transistor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technology {
    #[serde(rename = "MOSFET")]
    Mosfet,
    #[serde(rename = "SiC-MOSFET")]
    SicMosfet,
    #[serde(rename = "IGBT")]
    Igbt,
    #[serde(rename = "GaN-Transistor")]
    GanTransistor,
    #[serde(rename = "SiC-JFET")]
    SicJfet,
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Technology::Mosfet => "MOSFET",
            Technology::SicMosfet => "SiC-MOSFET",
            Technology::Igbt => "IGBT",
            Technology::GanTransistor => "GaN-Transistor",
            Technology::SicJfet => "SiC-JFET",
        };
        f.write_str(name)
    }
}

/// Absolute and continuous ratings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ratings {
    /// Absolute maximum blocking voltage (V).
    pub v_abs_max: f64,
    /// Absolute maximum current (A).
    pub i_abs_max: f64,
    /// Continuous current rating (A). Used as the quickstart working current.
    pub i_cont: f64,
}

impl Ratings {
    fn validate(&self) -> Result<()> {
        let values = [
            ("v_abs_max", self.v_abs_max),
            ("i_abs_max", self.i_abs_max),
            ("i_cont", self.i_cont),
        ];
        for (name, value) in values {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidDevice(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Identity and ratings of a transistor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransistorInfo {
    pub name: String,
    pub manufacturer: String,
    pub technology: Technology,
    pub ratings: Ratings,
}

/// A characterized transistor.
///
/// The working point starts unset. A successful [`Transistor::quickstart_wp`]
/// or [`Transistor::update_wp`] replaces it with a fully resolved value; a
/// failed call leaves the previous value untouched.
#[derive(Debug, Clone, Serialize)]
pub struct Transistor {
    name: String,
    manufacturer: String,
    technology: Technology,
    ratings: Ratings,
    switch: CharacterizedElement,
    diode: CharacterizedElement,
    #[serde(skip_serializing_if = "Option::is_none")]
    c_oss: Option<CurveDataset>,
    weights: MatchWeights,
    #[serde(skip_serializing_if = "Option::is_none")]
    wp: Option<WorkingPoint>,
}

impl Transistor {
    /// Create a transistor.
    ///
    /// `weights` are the matching weights of the transistor's device family.
    pub fn new(
        info: TransistorInfo,
        switch: CharacterizedElement,
        diode: CharacterizedElement,
        weights: MatchWeights,
    ) -> Result<Self> {
        if info.name.trim().is_empty() {
            return Err(Error::InvalidDevice("transistor name is empty".to_string()));
        }
        info.ratings.validate()?;
        if switch.role() != ElementRole::Switch {
            return Err(Error::InvalidDevice(format!(
                "{}: switch slot holds a {} element",
                info.name,
                switch.role()
            )));
        }
        if diode.role() != ElementRole::Diode {
            return Err(Error::InvalidDevice(format!(
                "{}: diode slot holds a {} element",
                info.name,
                diode.role()
            )));
        }

        Ok(Self {
            name: info.name,
            manufacturer: info.manufacturer,
            technology: info.technology,
            ratings: info.ratings,
            switch,
            diode,
            c_oss: None,
            weights,
            wp: None,
        })
    }

    /// Attach an output capacitance curve.
    pub fn with_c_oss(mut self, c_oss: CurveDataset) -> Result<Self> {
        if c_oss.kind() != CurveKind::Coss {
            return Err(Error::InvalidDevice(format!(
                "{}: expected a c_oss curve, got {}",
                self.name,
                c_oss.kind()
            )));
        }
        self.c_oss = Some(c_oss);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn technology(&self) -> Technology {
        self.technology
    }

    pub fn ratings(&self) -> &Ratings {
        &self.ratings
    }

    pub fn switch(&self) -> &CharacterizedElement {
        &self.switch
    }

    pub fn diode(&self) -> &CharacterizedElement {
        &self.diode
    }

    pub fn element(&self, role: ElementRole) -> &CharacterizedElement {
        match role {
            ElementRole::Switch => &self.switch,
            ElementRole::Diode => &self.diode,
        }
    }

    pub fn c_oss(&self) -> Option<&CurveDataset> {
        self.c_oss.as_ref()
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    /// The last resolved working point; `None` until the first successful update.
    pub fn wp(&self) -> Option<&WorkingPoint> {
        self.wp.as_ref()
    }

    /// Conditions used by [`Transistor::quickstart_wp`].
    ///
    /// Each element is evaluated at its own `t_j_max`, at the gate voltage of
    /// its first channel dataset, and at the continuous current rating.
    pub fn quickstart_request(&self) -> Result<WorkingPointRequest> {
        let conditions = |element: &CharacterizedElement| -> Result<OperatingConditions> {
            let first = element
                .channel()
                .first()
                .ok_or_else(|| element.channel().missing())?;
            Ok(OperatingConditions::new(
                element.t_j_max(),
                first.v_g().unwrap_or(0.0),
                self.ratings.i_cont,
            ))
        };
        Ok(WorkingPointRequest::new(
            conditions(&self.switch)?,
            conditions(&self.diode)?,
        ))
    }

    /// Resolve a representative working point from the datasheet ratings.
    pub fn quickstart_wp(&mut self) -> Result<&WorkingPoint> {
        let request = self.quickstart_request()?;
        log::debug!("{}: quickstart working point {:?}", self.name, request);
        self.update_wp_with(&request)
    }

    /// Resolve the working point with the same conditions for switch and diode.
    pub fn update_wp(&mut self, t_j: f64, v_g: f64, i_channel: f64) -> Result<&WorkingPoint> {
        self.update_wp_with(&WorkingPointRequest::uniform(t_j, v_g, i_channel))
    }

    /// Resolve the working point with separate switch and diode conditions.
    pub fn update_wp_with(&mut self, request: &WorkingPointRequest) -> Result<&WorkingPoint> {
        let wp = WorkingPoint::resolve(&self.switch, &self.diode, request, &self.weights)?;
        if wp.is_out_of_spec() {
            log::warn!("{}: working point resolved beyond t_j_max", self.name);
        }
        let wp: &WorkingPoint = self.wp.insert(wp);
        Ok(wp)
    }

    /// Linearized channel of one element, without touching the working point.
    pub fn calc_lin_channel(
        &self,
        role: ElementRole,
        conditions: &OperatingConditions,
    ) -> Result<LinearChannel> {
        let resolution = self.element(role).resolve_channel(conditions, &self.weights)?;
        Ok(resolution.linear)
    }

    /// Closest channel, turn-on and turn-off datasets of one element.
    pub fn find_approx_wp(&self, role: ElementRole, target: &MatchTarget) -> Result<MatchedSet<'_>> {
        self.element(role).find_approx_wp(target, &self.weights)
    }

    /// Output capacitance stored energy vs voltage, as `(v, E_oss)` pairs.
    pub fn calc_v_eoss(&self) -> Result<Vec<(f64, f64)>> {
        capacitance::energy_curve(self.require_c_oss()?)
    }

    /// Output capacitance charge vs voltage, as `(v, Q_oss)` pairs.
    pub fn calc_v_qoss(&self) -> Result<Vec<(f64, f64)>> {
        capacitance::charge_curve(self.require_c_oss()?)
    }

    fn require_c_oss(&self) -> Result<&CurveDataset> {
        self.c_oss.as_ref().ok_or(Error::Core(tdb_core::Error::MissingData {
            role: ElementRole::Switch,
            kind: CurveKind::Coss,
        }))
    }

    /// The whole record, working point included when resolved.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl fmt::Display for Transistor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}, {}): v_abs_max={}V i_abs_max={}A i_cont={}A",
            self.name,
            self.manufacturer,
            self.technology,
            self.ratings.v_abs_max,
            self.ratings.i_abs_max,
            self.ratings.i_cont
        )?;
        for element in [&self.switch, &self.diode] {
            let counts = element.dataset_counts();
            writeln!(
                f,
                "  {}: t_j_max={}°C channel={} e_on={} e_off={}",
                element.role(),
                element.t_j_max(),
                counts.channel,
                counts.e_on,
                counts.e_off
            )?;
        }
        match &self.wp {
            Some(wp) => write!(
                f,
                "  wp: t_j={}°C v_g={}V i={}A r_switch={:.4}Ω v_switch={:.4}V",
                wp.t_j(),
                wp.v_g(),
                wp.i_channel(),
                wp.switch_r_channel(),
                wp.switch_v_channel()
            ),
            None => write!(f, "  wp: unset"),
        }
    }
}
