//! Characterized switch and diode elements.
//!
//! Switch and diode share one type: an element is its role, its thermal
//! rating and its dataset collections. A diode's energy collections are empty.

use serde::{Deserialize, Serialize};
use tdb_core::{
    CurveDataset, CurveKind, DatasetCollection, ElementRole, Interpolated, LinearChannel,
    MatchTarget, MatchWeights, MeasuredConditions, OperatingConditions, OutOfRangeWarning,
    find_best_match, interpolate, linearize,
};

use crate::error::{Error, Result};

/// A switch or diode with its measured characteristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ElementRecord")]
pub struct CharacterizedElement {
    role: ElementRole,
    t_j_max: f64,
    channel: DatasetCollection,
    e_on: DatasetCollection,
    e_off: DatasetCollection,
}

#[derive(Debug, Deserialize)]
struct ElementRecord {
    role: ElementRole,
    t_j_max: f64,
    channel: DatasetCollection,
    e_on: Option<DatasetCollection>,
    e_off: Option<DatasetCollection>,
}

impl TryFrom<ElementRecord> for CharacterizedElement {
    type Error = Error;

    fn try_from(r: ElementRecord) -> Result<Self> {
        let e_on = r
            .e_on
            .unwrap_or_else(|| DatasetCollection::empty(r.role, CurveKind::EOn));
        let e_off = r
            .e_off
            .unwrap_or_else(|| DatasetCollection::empty(r.role, CurveKind::EOff));
        CharacterizedElement::new(r.role, r.t_j_max, r.channel, e_on, e_off)
    }
}

/// Number of datasets per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetCounts {
    pub channel: usize,
    pub e_on: usize,
    pub e_off: usize,
}

/// The three datasets chosen for one target.
#[derive(Debug, Clone, Copy)]
pub struct MatchedSet<'a> {
    pub channel: &'a CurveDataset,
    pub e_on: &'a CurveDataset,
    pub e_off: &'a CurveDataset,
}

/// Channel lookup plus linearization at one set of operating conditions.
#[derive(Debug, Clone, Copy)]
pub struct ChannelResolution<'a> {
    pub dataset: &'a CurveDataset,
    pub linear: LinearChannel,
    /// Set when the requested temperature exceeds `t_j_max`.
    pub thermal: Option<OutOfRangeWarning>,
}

impl ChannelResolution<'_> {
    pub fn warnings(&self) -> impl Iterator<Item = OutOfRangeWarning> + '_ {
        self.thermal.into_iter().chain(self.linear.warning)
    }
}

/// Switching energies read out at the working current.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwitchingEnergies {
    /// Turn-on energy (J).
    pub e_on: f64,
    /// Turn-off energy (J).
    pub e_off: f64,
    /// Conditions of the turn-on dataset used.
    pub e_on_dataset: MeasuredConditions,
    /// Conditions of the turn-off dataset used.
    pub e_off_dataset: MeasuredConditions,
}

impl SwitchingEnergies {
    /// Total energy per switching cycle (J).
    pub fn total(&self) -> f64 {
        self.e_on + self.e_off
    }
}

impl CharacterizedElement {
    /// Create an element, checking that every collection belongs to `role`
    /// and sits in the slot matching its kind.
    pub fn new(
        role: ElementRole,
        t_j_max: f64,
        channel: DatasetCollection,
        e_on: DatasetCollection,
        e_off: DatasetCollection,
    ) -> Result<Self> {
        if !t_j_max.is_finite() {
            return Err(Error::InvalidDevice(format!(
                "{role} t_j_max must be finite, got {t_j_max}"
            )));
        }
        for (collection, kind) in [
            (&channel, CurveKind::Channel),
            (&e_on, CurveKind::EOn),
            (&e_off, CurveKind::EOff),
        ] {
            if collection.role() != role || collection.kind() != kind {
                return Err(Error::InvalidDevice(format!(
                    "{role} {kind} slot holds a {} {} collection",
                    collection.role(),
                    collection.kind()
                )));
            }
        }

        Ok(Self {
            role,
            t_j_max,
            channel,
            e_on,
            e_off,
        })
    }

    pub fn switch(
        t_j_max: f64,
        channel: DatasetCollection,
        e_on: DatasetCollection,
        e_off: DatasetCollection,
    ) -> Result<Self> {
        Self::new(ElementRole::Switch, t_j_max, channel, e_on, e_off)
    }

    /// A diode has channel data only.
    pub fn diode(t_j_max: f64, channel: DatasetCollection) -> Result<Self> {
        Self::new(
            ElementRole::Diode,
            t_j_max,
            channel,
            DatasetCollection::empty(ElementRole::Diode, CurveKind::EOn),
            DatasetCollection::empty(ElementRole::Diode, CurveKind::EOff),
        )
    }

    pub fn role(&self) -> ElementRole {
        self.role
    }

    /// Rated maximum junction temperature (°C).
    pub fn t_j_max(&self) -> f64 {
        self.t_j_max
    }

    pub fn channel(&self) -> &DatasetCollection {
        &self.channel
    }

    pub fn e_on(&self) -> &DatasetCollection {
        &self.e_on
    }

    pub fn e_off(&self) -> &DatasetCollection {
        &self.e_off
    }

    pub fn dataset_counts(&self) -> DatasetCounts {
        DatasetCounts {
            channel: self.channel.len(),
            e_on: self.e_on.len(),
            e_off: self.e_off.len(),
        }
    }

    /// Both turn-on and turn-off data are present.
    pub fn has_energy_data(&self) -> bool {
        !self.e_on.is_empty() && !self.e_off.is_empty()
    }

    /// Warning for a junction temperature above the rating, if any.
    pub fn thermal_check(&self, t_j: f64) -> Option<OutOfRangeWarning> {
        (t_j > self.t_j_max).then_some(OutOfRangeWarning::AboveThermalLimit {
            role: self.role,
            t_j,
            t_j_max: self.t_j_max,
        })
    }

    pub fn find_channel(
        &self,
        target: &MatchTarget,
        weights: &MatchWeights,
    ) -> Result<&CurveDataset> {
        Ok(find_best_match(&self.channel, target, weights)?)
    }

    /// Closest channel, turn-on and turn-off datasets, each chosen on its own.
    pub fn find_approx_wp(
        &self,
        target: &MatchTarget,
        weights: &MatchWeights,
    ) -> Result<MatchedSet<'_>> {
        Ok(MatchedSet {
            channel: find_best_match(&self.channel, target, weights)?,
            e_on: find_best_match(&self.e_on, target, weights)?,
            e_off: find_best_match(&self.e_off, target, weights)?,
        })
    }

    /// Pick the closest channel curve and linearize it at `conditions.i_channel`.
    pub fn resolve_channel(
        &self,
        conditions: &OperatingConditions,
        weights: &MatchWeights,
    ) -> Result<ChannelResolution<'_>> {
        conditions.validate()?;
        let dataset = self.find_channel(&conditions.target(), weights)?;
        let linear = linearize(dataset, conditions.i_channel)?;

        let thermal = self.thermal_check(conditions.t_j);
        if let Some(w) = &thermal {
            log::warn!("{w}; working point is out of spec");
        }

        Ok(ChannelResolution {
            dataset,
            linear,
            thermal,
        })
    }

    /// Read turn-on and turn-off energy at `conditions.i_channel`.
    ///
    /// Fails with missing data when either energy collection is empty.
    pub fn switching_energies(
        &self,
        conditions: &OperatingConditions,
        weights: &MatchWeights,
    ) -> Result<(SwitchingEnergies, Vec<OutOfRangeWarning>)> {
        conditions.validate()?;
        let target = conditions.target();
        let on = find_best_match(&self.e_on, &target, weights)?;
        let off = find_best_match(&self.e_off, &target, weights)?;

        let Interpolated {
            value: e_on,
            warning: on_warning,
        } = interpolate(on, conditions.i_channel)?;
        let Interpolated {
            value: e_off,
            warning: off_warning,
        } = interpolate(off, conditions.i_channel)?;

        // Extrapolating below the first sample can cross zero.
        let energies = SwitchingEnergies {
            e_on: e_on.max(0.0),
            e_off: e_off.max(0.0),
            e_on_dataset: on.conditions(),
            e_off_dataset: off.conditions(),
        };
        let warnings = on_warning.into_iter().chain(off_warning).collect();
        Ok((energies, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(role: ElementRole, t_j: f64, v_g: f64) -> DatasetCollection {
        let curve =
            CurveDataset::channel_i_v(t_j, Some(v_g), vec![(0.0, 0.7), (50.0, 1.7), (100.0, 3.2)])
                .unwrap();
        DatasetCollection::new(role, CurveKind::Channel, vec![curve]).unwrap()
    }

    fn energy(kind: CurveKind, scale: f64) -> DatasetCollection {
        let curve = CurveDataset::energy(
            kind,
            150.0,
            Some(15.0),
            600.0,
            vec![(10.0, 1e-4 * scale), (50.0, 5e-4 * scale), (100.0, 1.2e-3 * scale)],
        )
        .unwrap();
        DatasetCollection::new(ElementRole::Switch, kind, vec![curve]).unwrap()
    }

    fn weights() -> MatchWeights {
        MatchWeights::new(10.0).unwrap()
    }

    #[test]
    fn test_slot_mismatch_is_rejected() {
        let err = CharacterizedElement::switch(
            175.0,
            channel(ElementRole::Switch, 25.0, 15.0),
            energy(CurveKind::EOff, 1.0),
            energy(CurveKind::EOn, 1.0),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidDevice(_)), "{err}");

        let err =
            CharacterizedElement::diode(175.0, channel(ElementRole::Switch, 25.0, 15.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidDevice(_)), "{err}");
    }

    #[test]
    fn test_diode_has_no_energy_data() {
        let d = CharacterizedElement::diode(175.0, channel(ElementRole::Diode, 25.0, -4.0)).unwrap();
        assert!(!d.has_energy_data());
        assert_eq!(
            d.dataset_counts(),
            DatasetCounts {
                channel: 1,
                e_on: 0,
                e_off: 0
            }
        );

        let err = d
            .find_approx_wp(&MatchTarget::new(25.0, -4.0), &weights())
            .unwrap_err();
        assert!(err.is_missing_data(), "{err}");
    }

    #[test]
    fn test_resolve_channel_flags_thermal_limit() {
        let s = CharacterizedElement::switch(
            150.0,
            channel(ElementRole::Switch, 150.0, 15.0),
            energy(CurveKind::EOn, 1.0),
            energy(CurveKind::EOff, 0.5),
        )
        .unwrap();

        let ok = s
            .resolve_channel(&OperatingConditions::new(125.0, 15.0, 25.0), &weights())
            .unwrap();
        assert!(ok.thermal.is_none());
        assert!((ok.linear.r_channel - 0.02).abs() < 1e-12);

        let hot = s
            .resolve_channel(&OperatingConditions::new(175.0, 15.0, 25.0), &weights())
            .unwrap();
        assert_eq!(
            hot.thermal,
            Some(OutOfRangeWarning::AboveThermalLimit {
                role: ElementRole::Switch,
                t_j: 175.0,
                t_j_max: 150.0
            })
        );
        assert_eq!(hot.warnings().count(), 1);
    }

    #[test]
    fn test_switching_energies_at_current() {
        let s = CharacterizedElement::switch(
            175.0,
            channel(ElementRole::Switch, 150.0, 15.0),
            energy(CurveKind::EOn, 1.0),
            energy(CurveKind::EOff, 0.5),
        )
        .unwrap();
        let (e, warnings) = s
            .switching_energies(&OperatingConditions::new(150.0, 15.0, 30.0), &weights())
            .unwrap();
        assert!((e.e_on - 3e-4).abs() < 1e-15, "e_on = {}", e.e_on);
        assert!((e.e_off - 1.5e-4).abs() < 1e-15, "e_off = {}", e.e_off);
        assert!((e.total() - 4.5e-4).abs() < 1e-15);
        assert_eq!(e.e_on_dataset.v_supply, Some(600.0));
        assert!(warnings.is_empty());

        // 0 A sits below the first sample at 10 A.
        let (e, warnings) = s
            .switching_energies(&OperatingConditions::new(150.0, 15.0, 0.0), &weights())
            .unwrap();
        assert!(e.e_on >= 0.0);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_deserialize_element_defaults_energy() {
        let json = r#"{
            "role": "diode",
            "t_j_max": 175.0,
            "channel": {
                "role": "diode",
                "kind": "channel",
                "datasets": [
                    {"kind": "channel", "axes": "voltage_current", "t_j": 25.0, "v_g": -4.0,
                     "points": [[0.0, 0.0], [1.0, 5.0], [2.0, 30.0]]}
                ]
            }
        }"#;
        let d: CharacterizedElement = serde_json::from_str(json).unwrap();
        assert_eq!(d.role(), ElementRole::Diode);
        assert!(d.e_on().is_empty());
        assert_eq!(d.e_on().role(), ElementRole::Diode);
        assert_eq!(d.channel().len(), 1);
    }
}
