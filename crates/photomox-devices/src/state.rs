//! Committed sensor state.
//!
//! One `SensorState` is owned per device instance and advanced only when the
//! surrounding solver accepts a step. Evaluations read it and return a
//! proposed successor; nothing here changes during trial evaluations.

use photomox_core::{FirstOrderLp, SecondOrderLp};

use crate::gas::GasEdge;
use crate::params::SensorParams;

/// Continuous state carried between accepted integration steps.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorState {
    /// Timestamp of the last accepted step (s).
    pub time: f64,
    /// Timestamp of the first evaluation; drift is measured from here.
    pub t_start: f64,
    /// Whether the first evaluation has stamped the start time.
    pub started: bool,
    /// LED internal node voltage across the parallel RC (V).
    pub led_vnode: f64,
    /// Filtered irradiance state.
    pub irr_lp: FirstOrderLp<f64>,
    /// Filtered gas concentration and its rate.
    pub gas: SecondOrderLp<f64>,
    /// Latched gas filter gain.
    pub gas_gain: f64,
    /// Latched primary gas pole time constant (s).
    pub gas_tp1: f64,
    /// Secondary gas pole time constant (s), re-derived each evaluation.
    pub gas_tp2: f64,
    /// Last classified direction of gas change.
    pub gas_edge: GasEdge,
    /// Raw gas sample at the last accepted step, for the derivative.
    pub gas_in_prev: f64,
}

impl SensorState {
    /// State before the first evaluation of a run.
    ///
    /// The irradiance path starts settled at the ambient floor, the gas
    /// filter at rest at zero, and the gas dynamics latched to the adsorption
    /// branch with both time constants at the ambient offset constant.
    pub fn initial(params: &SensorParams) -> Self {
        Self {
            time: 0.0,
            t_start: 0.0,
            started: false,
            led_vnode: 0.0,
            irr_lp: FirstOrderLp::new(params.irr_gain * params.irr_0),
            gas: SecondOrderLp::new(0.0),
            gas_gain: params.gas_gainon,
            gas_tp1: params.gas_t_irr_of,
            gas_tp2: params.gas_t_irr_of,
            gas_edge: GasEdge::Held,
            gas_in_prev: 0.0,
        }
    }
}
