//! Nearest-dataset lookup over a [`DatasetCollection`].
//!
//! Every dataset is scored against the target with
//!
//! ```text
//! distance = |Δt_j| / temperature_voltage_weight + |Δv_g| [+ |Δv_supply|]
//! ```
//!
//! and the lowest score wins. The gate term is dropped for datasets measured
//! without a gate voltage; the supply term is only added when both the target
//! and the dataset carry a supply voltage.
//!
//! Candidates within a relative tolerance of the lowest distance count as
//! tied. Ties are broken by the smaller temperature difference, then the
//! smaller gate voltage difference, then the smaller supply difference, and
//! finally by the lower measured conditions. Valid collections never hold two
//! datasets with identical conditions, so the winner does not depend on the
//! order the datasets were loaded in.
//!
//! No interpolation between datasets happens here: curve shapes are not
//! guaranteed to vary linearly with temperature or gate voltage.

use std::cmp::Ordering;

use crate::collection::DatasetCollection;
use crate::conditions::{MatchTarget, MatchWeights};
use crate::curve::CurveDataset;
use crate::error::Result;

/// Relative tolerance above the lowest distance that still counts as a tie.
const TIE_TOLERANCE: f64 = 1e-12;

/// How far a dataset is from a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    /// Weighted total used for ranking.
    pub distance: f64,
    /// |Δt_j| (°C).
    pub dt_j: f64,
    /// |Δv_g| (V), zero when the dataset has no gate voltage.
    pub dv_g: f64,
    /// |Δv_supply| (V), zero when either side has no supply voltage.
    pub dv_supply: f64,
}

impl MatchScore {
    pub fn new(dataset: &CurveDataset, target: &MatchTarget, weights: &MatchWeights) -> Self {
        let dt_j = (target.t_j - dataset.t_j()).abs();
        let dv_g = dataset.v_g().map_or(0.0, |v_g| (target.v_g - v_g).abs());
        let dv_supply = match (target.v_supply, dataset.v_supply()) {
            (Some(want), Some(have)) => (want - have).abs(),
            _ => 0.0,
        };

        Self {
            distance: dt_j / weights.temperature_voltage() + dv_g + dv_supply,
            dt_j,
            dv_g,
            dv_supply,
        }
    }
}

/// Return the dataset in `collection` closest to `target`.
///
/// Fails with [`crate::Error::MissingData`] when the collection is empty.
pub fn find_best_match<'a>(
    collection: &'a DatasetCollection,
    target: &MatchTarget,
    weights: &MatchWeights,
) -> Result<&'a CurveDataset> {
    target.validate()?;

    let scored: Vec<(&CurveDataset, MatchScore)> = collection
        .iter()
        .map(|dataset| (dataset, MatchScore::new(dataset, target, weights)))
        .collect();

    let nearest = scored
        .iter()
        .map(|(_, score)| score.distance)
        .min_by(f64::total_cmp)
        .ok_or_else(|| collection.missing())?;
    let cutoff = nearest + TIE_TOLERANCE * nearest.abs().max(1.0);

    let (dataset, score) = scored
        .into_iter()
        .filter(|(_, score)| score.distance <= cutoff)
        .min_by(|(a, sa), (b, sb)| rank(a, sa, b, sb))
        .ok_or_else(|| collection.missing())?;
    log::debug!(
        "{} {}: target t_j={} v_g={} -> dataset {} (distance {:.4})",
        collection.role(),
        collection.kind(),
        target.t_j,
        target.v_g,
        dataset.conditions(),
        score.distance
    );
    Ok(dataset)
}

/// Total order over tied candidates; `Less` means `a` is the better match.
fn rank(a: &CurveDataset, sa: &MatchScore, b: &CurveDataset, sb: &MatchScore) -> Ordering {
    sa.dt_j
        .total_cmp(&sb.dt_j)
        .then_with(|| sa.dv_g.total_cmp(&sb.dv_g))
        .then_with(|| sa.dv_supply.total_cmp(&sb.dv_supply))
        .then_with(|| a.t_j().total_cmp(&b.t_j()))
        .then_with(|| cmp_option(a.v_g(), b.v_g()))
        .then_with(|| cmp_option(a.v_supply(), b.v_supply()))
}

fn cmp_option(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::ElementRole;
    use crate::curve::CurveKind;
    use crate::Error;

    fn channel(t_j: f64, v_g: f64) -> CurveDataset {
        CurveDataset::channel_i_v(t_j, Some(v_g), vec![(0.0, 0.0), (10.0, 1.0)]).unwrap()
    }

    fn channels(conditions: &[(f64, f64)]) -> DatasetCollection {
        DatasetCollection::new(
            ElementRole::Switch,
            CurveKind::Channel,
            conditions.iter().map(|&(t, v)| channel(t, v)).collect(),
        )
        .unwrap()
    }

    fn weights() -> MatchWeights {
        MatchWeights::new(10.0).unwrap()
    }

    #[test]
    fn test_score_scenario() {
        let target = MatchTarget::new(100.0, 15.0);
        let cold = MatchScore::new(&channel(25.0, 15.0), &target, &weights());
        let hot = MatchScore::new(&channel(150.0, 15.0), &target, &weights());
        assert!((cold.distance - 7.5).abs() < 1e-12, "{}", cold.distance);
        assert!((hot.distance - 5.0).abs() < 1e-12, "{}", hot.distance);
    }

    #[test]
    fn test_picks_closest_temperature() {
        let c = channels(&[(25.0, 15.0), (150.0, 15.0)]);
        let found = find_best_match(&c, &MatchTarget::new(100.0, 15.0), &weights()).unwrap();
        assert_eq!(found.t_j(), 150.0);
    }

    #[test]
    fn test_exact_match_is_returned() {
        let c = channels(&[(25.0, 15.0), (25.0, 18.0), (150.0, 15.0), (150.0, 18.0)]);
        for _ in 0..3 {
            let found = find_best_match(&c, &MatchTarget::new(150.0, 18.0), &weights()).unwrap();
            assert!(std::ptr::eq(found, &c.datasets()[3]));
        }
    }

    #[test]
    fn test_gate_voltage_weighs_against_temperature() {
        // 50 °C away at the right gate voltage (5.0) beats the right
        // temperature 6 V off (6.0).
        let c = channels(&[(25.0, 9.0), (75.0, 15.0)]);
        let found = find_best_match(&c, &MatchTarget::new(25.0, 15.0), &weights()).unwrap();
        assert_eq!(found.t_j(), 75.0);
    }

    #[test]
    fn test_tie_prefers_smaller_temperature_difference() {
        // Both at distance 2.0: (25, 13) is 0 °C + 2 V away, (45, 15) is 20 °C + 0 V away.
        let forward = channels(&[(45.0, 15.0), (25.0, 13.0)]);
        let reverse = channels(&[(25.0, 13.0), (45.0, 15.0)]);
        let target = MatchTarget::new(25.0, 15.0);

        for c in [&forward, &reverse] {
            let found = find_best_match(c, &target, &weights()).unwrap();
            assert_eq!((found.t_j(), found.v_g()), (25.0, Some(13.0)));
        }
    }

    #[test]
    fn test_symmetric_tie_is_independent_of_load_order() {
        // 100 °C sits exactly between 75 and 125: every score component ties.
        let forward = channels(&[(125.0, 15.0), (75.0, 15.0)]);
        let reverse = channels(&[(75.0, 15.0), (125.0, 15.0)]);
        let target = MatchTarget::new(100.0, 15.0);

        let a = find_best_match(&forward, &target, &weights()).unwrap();
        let b = find_best_match(&reverse, &target, &weights()).unwrap();
        assert_eq!(a.t_j(), b.t_j());
        assert_eq!(a.t_j(), 75.0);
    }

    #[test]
    fn test_near_ties_chain_is_independent_of_load_order() {
        // Distances 1.0, 1.0 + 0.6e-12 and 1.0 + 1.2e-12: the middle one is
        // within tolerance of both neighbours, the outer two are not.
        let a = (90.0, 15.0);
        let b = (95.0, 14.5 - 0.6e-12);
        let c = (100.0, 14.0 - 1.2e-12);
        let target = MatchTarget::new(100.0, 15.0);

        let orders = [[a, b, c], [a, c, b], [b, a, c], [b, c, a], [c, a, b], [c, b, a]];
        for order in orders {
            let chans = channels(&order);
            let found = find_best_match(&chans, &target, &weights()).unwrap();
            assert_eq!(found.t_j(), 95.0, "load order {:?}", order);
        }
    }

    #[test]
    fn test_supply_voltage_only_when_requested() {
        let e = |v_supply: f64, t_j: f64| {
            CurveDataset::energy(
                CurveKind::EOn,
                t_j,
                Some(15.0),
                v_supply,
                vec![(0.0, 0.0), (10.0, 1e-4)],
            )
            .unwrap()
        };
        let c = DatasetCollection::new(
            ElementRole::Switch,
            CurveKind::EOn,
            vec![e(400.0, 25.0), e(800.0, 150.0)],
        )
        .unwrap();

        let found = find_best_match(&c, &MatchTarget::new(125.0, 15.0), &weights()).unwrap();
        assert_eq!(found.v_supply(), Some(800.0));

        let target = MatchTarget::new(125.0, 15.0).with_v_supply(400.0);
        let found = find_best_match(&c, &target, &weights()).unwrap();
        assert_eq!(found.v_supply(), Some(400.0));
    }

    #[test]
    fn test_dataset_without_gate_voltage() {
        let diode = CurveDataset::channel_i_v(125.0, None, vec![(0.0, 0.8), (50.0, 1.6)]).unwrap();
        let c = DatasetCollection::new(ElementRole::Diode, CurveKind::Channel, vec![diode])
            .unwrap();
        let target = MatchTarget::new(125.0, -4.0);
        let score = MatchScore::new(c.first().unwrap(), &target, &weights());
        assert_eq!(score.distance, 0.0);
        assert!(find_best_match(&c, &target, &weights()).is_ok());
    }

    #[test]
    fn test_empty_collection_is_missing_data() {
        let c = DatasetCollection::empty(ElementRole::Switch, CurveKind::EOff);
        let err = find_best_match(&c, &MatchTarget::new(25.0, 15.0), &weights()).unwrap_err();
        match err {
            Error::MissingData { role, kind } => {
                assert_eq!(role, ElementRole::Switch);
                assert_eq!(kind, CurveKind::EOff);
            }
            other => panic!("expected MissingData, got {other}"),
        }
    }

    #[test]
    fn test_rejects_non_finite_target() {
        let c = channels(&[(25.0, 15.0)]);
        let err = find_best_match(&c, &MatchTarget::new(f64::NAN, 15.0), &weights()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
