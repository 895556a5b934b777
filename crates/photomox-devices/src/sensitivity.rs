//! Sensitivity stage.
//!
//! The sensitivity is a log-normal bell in filtered irradiance, scaled by the
//! filtered gas concentration. Its peak sits at an irradiance that itself
//! moves with concentration, so the operating point of the LED tunes which
//! concentrations the sensor responds to most strongly.

use std::f64::consts::PI;

use photomox_core::{floor_positive, NUMERIC_FLOOR};

use crate::params::SensorParams;

/// Sensitivity evaluated at one operating point.
#[derive(Debug, Clone, Copy)]
pub struct Sensitivity {
    /// The sensitivity value itself.
    pub value: f64,
    /// Irradiance of peak sensitivity at the current concentration.
    pub peak_irr: f64,
    /// Mean of the underlying log-normal shape.
    pub mean_log: f64,
    /// Number of numeric guards that fired.
    pub clamps: u32,
}

/// Compute the log-normal sensitivity response.
///
/// ```text
/// peak_irr = sens_irrs * conc + sens_irro
/// mean_log = ln(peak_irr) + sens_std^2
/// value    = conc * 10 / (irr_lp * sens_std * sqrt(2*pi))
///            * exp(-(ln(irr_lp) - mean_log)^2 / (2 * sens_std^2))
/// ```
///
/// Both logarithm operands are floored before use; a negative concentration
/// (filter undershoot) contributes as zero.
pub fn response(params: &SensorParams, irr_lp: f64, conc: f64) -> Sensitivity {
    let mut clamps = 0;
    let conc = conc.max(0.0);

    let (irr_lp, clamped) = floor_positive("filtered irradiance", irr_lp, NUMERIC_FLOOR);
    clamps += clamped as u32;

    let peak_raw = params.sens_irrs * conc + params.sens_irro;
    let (peak_irr, clamped) = floor_positive("peak-sensitivity irradiance", peak_raw, NUMERIC_FLOOR);
    clamps += clamped as u32;

    let std = params.sens_std;
    let mean_log = peak_irr.ln() + std * std;

    let spread = irr_lp.ln() - mean_log;
    let shape = (-spread * spread / (2.0 * std * std)).exp();
    let value = conc * 10.0 / (irr_lp * std * (2.0 * PI).sqrt()) * shape;

    Sensitivity {
        value,
        peak_irr,
        mean_log,
        clamps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_concentration_gives_zero_sensitivity() {
        let params = SensorParams::default();
        let s = response(&params, 1.0, 0.0);
        assert_eq!(s.value, 0.0);
        assert_eq!(s.clamps, 0);
    }

    #[test]
    fn test_negative_concentration_treated_as_zero() {
        let params = SensorParams::default();
        let s = response(&params, 1.0, -0.3);
        assert_eq!(s.value, 0.0);
    }

    #[test]
    fn test_bell_peaks_near_mean() {
        // Fix concentration, sweep irradiance: the response must be maximal
        // where ln(irr) equals the log-mean, and fall off on both sides.
        let params = SensorParams::default();
        let conc = 1.0;
        let peak_irr = params.sens_irrs * conc + params.sens_irro;
        let irr_peak = (peak_irr.ln() + params.sens_std * params.sens_std).exp();

        let at_peak = response(&params, irr_peak, conc).value;
        // The 1/irr_lp prefactor shifts the true maximum slightly below the
        // shape mean; sample well off the peak instead of adjacent to it.
        let below = response(&params, irr_peak / 4.0, conc).value;
        let above = response(&params, irr_peak * 4.0, conc).value;
        assert!(at_peak > below, "peak {} vs below {}", at_peak, below);
        assert!(at_peak > above, "peak {} vs above {}", at_peak, above);
    }

    #[test]
    fn test_zero_irradiance_is_guarded() {
        let params = SensorParams::default();
        let s = response(&params, 0.0, 1.0);
        assert!(s.value.is_finite());
        assert!(s.clamps > 0, "the irradiance floor should have fired");
    }

    #[test]
    fn test_negative_peak_operand_is_guarded() {
        let params = SensorParams {
            sens_irrs: -5.0,
            sens_irro: 0.0,
            ..Default::default()
        };
        let s = response(&params, 1.0, 1.0);
        assert!(s.value.is_finite());
        assert!(s.clamps > 0);
    }

    #[test]
    fn test_sensitivity_scales_with_concentration_at_fixed_shape() {
        // With the peak pinned (slope zero), doubling concentration doubles
        // the response exactly.
        let params = SensorParams {
            sens_irrs: 0.0,
            ..Default::default()
        };
        let s1 = response(&params, 1.5, 1.0).value;
        let s2 = response(&params, 1.5, 2.0).value;
        assert!((s2 / s1 - 2.0).abs() < 1e-12, "ratio = {}", s2 / s1);
    }
}
