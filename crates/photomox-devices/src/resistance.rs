//! Base resistance and resistance synthesis.
//!
//! Light alone sets a base resistance through a power law in filtered
//! irradiance. Gas adds a conductance path scaled by the sensitivity stage,
//! and aging adds a slow linear drift. The terminal behaves as one variable
//! resistor: the dynamics only modulate its value.

use photomox_core::guard::GMIN;
use photomox_core::{floor_positive, NUMERIC_FLOOR};

use crate::params::SensorParams;

/// Light-only sensor resistance: `sensor_r0 / (1 + alpha * irr_lp^beta)`.
///
/// Returns the resistance and the number of guards that fired. The filtered
/// irradiance is floored before exponentiation.
pub fn base_resistance(params: &SensorParams, irr_lp: f64) -> (f64, u32) {
    let (irr_lp, clamped) = floor_positive("base-resistance irradiance", irr_lp, NUMERIC_FLOOR);
    let r = params.sensor_r0 / (1.0 + params.rbase_alpha * irr_lp.powf(params.rbase_beta));
    (r, clamped as u32)
}

/// Gas-induced conductance: `(1/resp) * (1/r_base) * conc^sensor_r`.
///
/// The sensitivity and base resistance are floored before inversion, a
/// negative concentration contributes as zero, and the result is floored at
/// Gmin so the series synthesis stays finite at zero gas.
pub fn gas_conductance(params: &SensorParams, resp: f64, r_base: f64, conc: f64) -> (f64, u32) {
    let mut clamps = 0;

    let (resp, clamped) = floor_positive("sensitivity divisor", resp, NUMERIC_FLOOR);
    clamps += clamped as u32;
    let (r_base, clamped) = floor_positive("base-resistance divisor", r_base, NUMERIC_FLOOR);
    clamps += clamped as u32;

    let g = (1.0 / resp) * (1.0 / r_base) * conc.max(0.0).powf(params.sensor_r);
    (g.max(GMIN), clamps)
}

/// Aging drift resistance, linear in elapsed simulated time.
///
/// Elapsed time is measured from the first evaluation of the run and clamps
/// at zero, so the drift term is monotonically non-decreasing and can never
/// pull the total resistance down.
pub fn drift_resistance(params: &SensorParams, elapsed: f64) -> f64 {
    params.drift_coef * elapsed.max(0.0)
}

/// Total terminal resistance: `r_base + 1/g_gas + r_drift`.
pub fn total_resistance(r_base: f64, g_gas: f64, r_drift: f64) -> f64 {
    r_base + 1.0 / g_gas + r_drift
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_resistance_falls_with_irradiance() {
        let params = SensorParams::default();
        let (r_dim, _) = base_resistance(&params, 1.0);
        let (r_bright, _) = base_resistance(&params, 4.0);
        assert!(
            r_bright < r_dim,
            "more light must lower resistance: {} vs {}",
            r_bright,
            r_dim
        );
        assert!(r_dim < params.sensor_r0);
    }

    #[test]
    fn test_base_resistance_guards_zero_irradiance() {
        let params = SensorParams::default();
        let (r, clamps) = base_resistance(&params, 0.0);
        assert!(r.is_finite());
        assert!(r > 0.0);
        assert_eq!(clamps, 1);
    }

    #[test]
    fn test_gas_conductance_zero_gas_hits_gmin() {
        let params = SensorParams::default();
        let (g, _) = gas_conductance(&params, 1.0, 1e5, 0.0);
        assert_eq!(g, GMIN);
    }

    #[test]
    fn test_gas_conductance_grows_with_concentration() {
        let params = SensorParams::default();
        let (g1, _) = gas_conductance(&params, 1.0, 1e5, 1.0);
        let (g2, _) = gas_conductance(&params, 1.0, 1e5, 2.0);
        assert!(g2 > g1);
        // Power law with the configured exponent
        assert!(
            (g2 / g1 - 2.0_f64.powf(params.sensor_r)).abs() < 1e-12,
            "ratio = {}",
            g2 / g1
        );
    }

    #[test]
    fn test_gas_conductance_guards_degenerate_divisors() {
        let params = SensorParams::default();
        let (g, clamps) = gas_conductance(&params, 0.0, 0.0, 1.0);
        assert!(g.is_finite());
        assert_eq!(clamps, 2);
    }

    #[test]
    fn test_drift_is_monotone_and_clamped() {
        let params = SensorParams::default();
        assert_eq!(drift_resistance(&params, -5.0), 0.0);
        let r1 = drift_resistance(&params, 10.0);
        let r2 = drift_resistance(&params, 20.0);
        assert!(r2 > r1);
        assert!((r2 - 2.0 * r1).abs() < 1e-12, "drift must be linear");
    }

    #[test]
    fn test_total_resistance_composition() {
        let r = total_resistance(5e4, 1e-4, 3.0);
        assert!((r - (5e4 + 1e4 + 3.0)).abs() < 1e-9);
    }
}
