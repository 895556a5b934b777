//! Gas adsorption/desorption dynamics.
//!
//! The raw gas-concentration signal drives a second-order filter whose gain
//! and pole placement depend on the direction of concentration change and on
//! the instantaneous irradiance. Direction is classified against a hysteresis
//! band on the signal's time derivative; inside the band the latched gain and
//! primary pole are held unchanged, which keeps numerical noise near zero
//! derivative from chattering the dynamics. The secondary pole is always
//! re-derived from the (possibly latched) primary by a fixed ratio.

use photomox_core::{floor_positive, NUMERIC_FLOOR, SecondOrderLp};

use crate::params::SensorParams;

/// Hysteresis band half-width on the gas derivative (units/s).
pub const EDGE_THRESHOLD: f64 = 0.1;

/// Classified direction of gas-concentration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasEdge {
    /// Derivative above the band: adsorption dynamics.
    Rising,
    /// Derivative below the band: desorption dynamics.
    Falling,
    /// Derivative inside the band: latched dynamics held.
    Held,
}

/// Classify the raw gas derivative against the hysteresis band.
pub fn detect_edge(ddt_gas_in: f64) -> GasEdge {
    if ddt_gas_in > EDGE_THRESHOLD {
        GasEdge::Rising
    } else if ddt_gas_in < -EDGE_THRESHOLD {
        GasEdge::Falling
    } else {
        GasEdge::Held
    }
}

/// Gain and primary pole for a detected edge, or `None` inside the band.
///
/// Rising: `tp1 = gas_t_irr_of * (1/irr)^gas_t_irr_m` with the adsorption
/// gain. Falling: the same pole scaled by `gas_r_onoff` with the desorption
/// gain. The irradiance is floored before the reciprocal power.
pub fn relatch(params: &SensorParams, edge: GasEdge, irr: f64) -> Option<(f64, f64)> {
    let (irr, _) = floor_positive("gas pole irradiance", irr, NUMERIC_FLOOR);
    let tp_base = params.gas_t_irr_of * (1.0 / irr).powf(params.gas_t_irr_m);

    match edge {
        GasEdge::Rising => Some((params.gas_gainon, tp_base)),
        GasEdge::Falling => Some((params.gas_gainoff, tp_base * params.gas_r_onoff)),
        GasEdge::Held => None,
    }
}

/// Secondary pole derived from the primary by the fixed ratio.
pub fn secondary_pole(params: &SensorParams, tp1: f64) -> f64 {
    tp1 / params.gas_r_t1t2
}

/// Driving term of the second-order filter:
/// `gain/2 * (2*d(gasIn)/dt + gasIn*(tp1 + tp2))`.
pub fn drive(gain: f64, gas_in: f64, ddt_gas_in: f64, tp1: f64, tp2: f64) -> f64 {
    gain / 2.0 * (2.0 * ddt_gas_in + gas_in * (tp1 + tp2))
}

/// Propose the filtered-concentration state after a step of length `h`.
///
/// The filter is the coupled pair
///
/// ```text
/// d(conc)/dt = rate
/// d(rate)/dt = drive - rate*tp1*tp2 - conc*(tp1 + tp2)
/// ```
///
/// stepped implicitly as one 2-state linear system.
pub fn filter_step(
    state: SecondOrderLp<f64>,
    gain: f64,
    gas_in: f64,
    ddt_gas_in: f64,
    tp1: f64,
    tp2: f64,
    h: f64,
) -> SecondOrderLp<f64> {
    let damping = tp1 * tp2;
    let stiffness = tp1 + tp2;
    state.step_be(damping, stiffness, drive(gain, gas_in, ddt_gas_in, tp1, tp2), h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_edge_band() {
        assert_eq!(detect_edge(0.2), GasEdge::Rising);
        assert_eq!(detect_edge(-0.2), GasEdge::Falling);
        assert_eq!(detect_edge(0.0), GasEdge::Held);
        assert_eq!(detect_edge(0.1), GasEdge::Held);
        assert_eq!(detect_edge(-0.1), GasEdge::Held);
    }

    #[test]
    fn test_relatch_held_returns_none() {
        let params = SensorParams::default();
        assert!(relatch(&params, GasEdge::Held, 2.0).is_none());
    }

    #[test]
    fn test_relatch_rising_pole_shrinks_with_irradiance() {
        let params = SensorParams::default();
        let (_, tp_dim) = relatch(&params, GasEdge::Rising, 1.0).unwrap();
        let (_, tp_bright) = relatch(&params, GasEdge::Rising, 4.0).unwrap();
        assert!(
            tp_bright < tp_dim,
            "brighter should respond faster: {} vs {}",
            tp_bright,
            tp_dim
        );
    }

    #[test]
    fn test_relatch_asymmetry_factor() {
        let params = SensorParams::default();
        let irr = 2.5;
        let (gain_on, tp_on) = relatch(&params, GasEdge::Rising, irr).unwrap();
        let (gain_off, tp_off) = relatch(&params, GasEdge::Falling, irr).unwrap();
        assert_eq!(gain_on, params.gas_gainon);
        assert_eq!(gain_off, params.gas_gainoff);
        assert!(
            (tp_off / tp_on - params.gas_r_onoff).abs() < 1e-12,
            "pole ratio = {} (expected {})",
            tp_off / tp_on,
            params.gas_r_onoff
        );
    }

    #[test]
    fn test_relatch_zero_irradiance_is_guarded() {
        let params = SensorParams::default();
        let (_, tp) = relatch(&params, GasEdge::Rising, 0.0).unwrap();
        assert!(tp.is_finite());
    }

    #[test]
    fn test_secondary_pole_ratio() {
        let params = SensorParams::default();
        let tp2 = secondary_pole(&params, 8.0);
        assert!((8.0 / tp2 - params.gas_r_t1t2).abs() < 1e-12);
    }

    #[test]
    fn test_filter_steady_state() {
        // Constant input, zero derivative: settles to gain/2 * input.
        let params = SensorParams::default();
        let (gain, tp1) = relatch(&params, GasEdge::Rising, 1.0).unwrap();
        let tp2 = secondary_pole(&params, tp1);
        let mut state = SecondOrderLp::new(0.0);
        let u = 2.0;
        for _ in 0..50_000 {
            state = filter_step(state, gain, u, 0.0, tp1, tp2, 1e-3);
        }
        let expected = gain / 2.0 * u;
        assert!(
            (state.y - expected).abs() < 1e-4,
            "settled at {} (expected {})",
            state.y,
            expected
        );
        assert!(state.rate.abs() < 1e-6);
    }

    #[test]
    fn test_filter_rises_toward_input() {
        let params = SensorParams::default();
        let (gain, tp1) = relatch(&params, GasEdge::Rising, 1.0).unwrap();
        let tp2 = secondary_pole(&params, tp1);
        let mut state = SecondOrderLp::new(0.0);
        for _ in 0..100 {
            state = filter_step(state, gain, 1.0, 0.0, tp1, tp2, 1e-2);
        }
        assert!(state.y > 0.0, "concentration should rise: {}", state.y);
        assert!(state.y < gain / 2.0, "no overshoot this early: {}", state.y);
    }
}
