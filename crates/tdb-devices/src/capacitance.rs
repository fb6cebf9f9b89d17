//! Stored energy and charge of the output capacitance.

use tdb_core::{CurveDataset, CurveKind};

use crate::error::{Error, Result};

/// Cumulative `E_oss(v) = ∫ v·C(v) dv` from the first sample, as `(v, E)` pairs.
pub fn energy_curve(c_oss: &CurveDataset) -> Result<Vec<(f64, f64)>> {
    check_kind(c_oss)?;
    Ok(cumulative_trapezoid(c_oss.points(), |v, c| v * c))
}

/// Cumulative `Q_oss(v) = ∫ C(v) dv` from the first sample, as `(v, Q)` pairs.
pub fn charge_curve(c_oss: &CurveDataset) -> Result<Vec<(f64, f64)>> {
    check_kind(c_oss)?;
    Ok(cumulative_trapezoid(c_oss.points(), |_, c| c))
}

fn check_kind(curve: &CurveDataset) -> Result<()> {
    if curve.kind() == CurveKind::Coss {
        Ok(())
    } else {
        Err(Error::InvalidDevice(format!(
            "expected a c_oss curve, got {}",
            curve.kind()
        )))
    }
}

fn cumulative_trapezoid(points: &[(f64, f64)], integrand: impl Fn(f64, f64) -> f64) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    let mut prev: Option<(f64, f64)> = None;

    for &(v, c) in points {
        let f = integrand(v, c);
        if let Some((v0, f0)) = prev {
            acc += 0.5 * (f0 + f) * (v - v0);
        }
        out.push((v, acc));
        prev = Some((v, f));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_capacitance() {
        let c = CurveDataset::c_oss(25.0, vec![(0.0, 1e-9), (50.0, 1e-9), (100.0, 1e-9)]).unwrap();

        let q = charge_curve(&c).unwrap();
        let e = energy_curve(&c).unwrap();
        assert_eq!(q.len(), 3);
        assert_eq!(q[0], (0.0, 0.0));
        assert!((q[2].1 - 1e-7).abs() < 1e-20, "Q(100) = {}", q[2].1);
        // E = C v^2 / 2
        assert!((e[1].1 - 1.25e-6).abs() < 1e-18, "E(50) = {}", e[1].1);
        assert!((e[2].1 - 5e-6).abs() < 1e-18, "E(100) = {}", e[2].1);
    }

    #[test]
    fn test_rejects_channel_curve() {
        let ch = CurveDataset::channel_i_v(25.0, None, vec![(0.0, 0.0), (1.0, 1.0)]).unwrap();
        assert!(matches!(charge_curve(&ch), Err(Error::InvalidDevice(_))));
    }
}
