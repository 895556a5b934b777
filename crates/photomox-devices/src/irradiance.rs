//! Irradiance stage.
//!
//! LED current maps affinely to instantaneous irradiance, which then passes
//! through a first-order inertial filter modeling the thermal/optical lag of
//! the photodetector response. The filter is a true ODE state advanced by the
//! integration step, not a memoryless approximation.

use photomox_core::FirstOrderLp;

use crate::params::SensorParams;

/// Instantaneous irradiance at a given LED current.
pub fn instantaneous(params: &SensorParams, i_led: f64) -> f64 {
    params.irr_0 + params.irr_m * i_led
}

/// Propose the filtered-irradiance state after a step of length `h`.
///
/// Realizes `tp * d(irr_lp)/dt + irr_lp = gain * irr`.
pub fn filter_step(
    params: &SensorParams,
    state: FirstOrderLp<f64>,
    irr: f64,
    h: f64,
) -> FirstOrderLp<f64> {
    state.step_be(params.irr_tp, params.irr_gain, irr, h)
}
