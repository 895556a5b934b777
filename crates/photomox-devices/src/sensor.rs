//! The photo-activated MOX sensor device.
//!
//! Evaluation is a pure function of the committed state and the inputs: it
//! returns the terminal current, a proposed successor state, and diagnostics,
//! and never mutates the device. The surrounding solver may call it any
//! number of times at a fixed instant with different trial voltages; only
//! [`PhotoMoxSensor::commit`] advances the committed state, once per accepted
//! integration step.

use nalgebra::{DMatrix, DVector};
use photomox_core::{ensure_finite, floor_positive, thermal_voltage};

use crate::error::Result;
use crate::gas::{self, GasEdge};
use crate::led::{self, NodeCriteria};
use crate::params::SensorParams;
use crate::state::SensorState;
use crate::{irradiance, resistance, sensitivity};

/// Floor applied to the ambient temperature input (K).
const TEMP_FLOOR: f64 = 1.0;

/// Per-evaluation inputs, owned by the external solver.
#[derive(Debug, Clone, Copy)]
pub struct EvalInputs {
    /// Absolute simulation time (s).
    pub time: f64,
    /// LED drive voltage (V).
    pub led_voltage: f64,
    /// Raw gas-concentration input signal.
    pub gas_in: f64,
    /// Voltage across the sensor terminals (V).
    pub terminal_voltage: f64,
    /// Ambient temperature (K).
    pub temp_k: f64,
}

/// Stateless quantities derived during one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct Diagnostics {
    /// LED junction current (A).
    pub led_current: f64,
    /// Whether the local LED node solve met tolerance.
    pub led_converged: bool,
    /// Instantaneous irradiance.
    pub irradiance: f64,
    /// Filtered irradiance.
    pub irr_filtered: f64,
    /// Filtered gas concentration (clamped non-negative).
    pub concentration: f64,
    /// Direction classification used this evaluation.
    pub edge: GasEdge,
    /// Light-only base resistance (ohms).
    pub r_base: f64,
    /// Sensitivity value.
    pub sensitivity: f64,
    /// Gas-induced conductance (S).
    pub g_gas: f64,
    /// Drift resistance (ohms).
    pub r_drift: f64,
    /// Total terminal resistance (ohms).
    pub r_total: f64,
    /// Number of numeric guards that fired.
    pub clamps: u32,
}

/// Result of one evaluation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Terminal current (A).
    pub current: f64,
    /// Proposed successor state, applied by [`PhotoMoxSensor::commit`].
    pub state: SensorState,
    /// Stateless derived quantities.
    pub diagnostics: Diagnostics,
}

/// A photo-activated metal-oxide gas sensor.
#[derive(Debug, Clone)]
pub struct PhotoMoxSensor {
    /// Device name (e.g., "U1").
    pub name: String,
    /// Model parameters.
    pub params: SensorParams,
    /// Convergence criteria for the local LED node solve.
    pub criteria: NodeCriteria,
    state: SensorState,
}

impl PhotoMoxSensor {
    /// Create a sensor with default parameters.
    pub fn new(name: impl Into<String>) -> Self {
        let params = SensorParams::default();
        let state = SensorState::initial(&params);
        Self {
            name: name.into(),
            params,
            criteria: NodeCriteria::default(),
            state,
        }
    }

    /// Create a sensor with validated parameters.
    pub fn with_params(name: impl Into<String>, params: SensorParams) -> Result<Self> {
        params.validate()?;
        let state = SensorState::initial(&params);
        Ok(Self {
            name: name.into(),
            params,
            criteria: NodeCriteria::default(),
            state,
        })
    }

    /// The committed state.
    pub fn state(&self) -> &SensorState {
        &self.state
    }

    /// Evaluate against the committed state.
    pub fn evaluate(&self, inputs: &EvalInputs) -> Result<Evaluation> {
        self.evaluate_at(&self.state, inputs)
    }

    /// Evaluate against an explicit previous state.
    ///
    /// Pure: neither the device nor `state` is mutated. The step length is
    /// the distance from `state.time` to `inputs.time`; trial evaluations at
    /// the committed instant see a zero-length step and leave every dynamic
    /// state and latched gas parameter in the proposal unchanged.
    pub fn evaluate_at(&self, state: &SensorState, inputs: &EvalInputs) -> Result<Evaluation> {
        let params = &self.params;
        let mut clamps = 0;

        // First evaluation stamps the start of the run; it sees a zero-length
        // step regardless of its timestamp.
        let t_start = if state.started {
            state.t_start
        } else {
            inputs.time
        };
        let h = if state.started {
            (inputs.time - state.time).max(0.0)
        } else {
            0.0
        };

        let (temp_k, clamped) = floor_positive("temperature", inputs.temp_k, TEMP_FLOOR);
        clamps += clamped as u32;
        let vt = thermal_voltage(temp_k);

        // LED electro-optical stage
        let node = led::solve_node(
            params,
            vt,
            inputs.led_voltage,
            state.led_vnode,
            h,
            &self.criteria,
        );
        let v_node = ensure_finite("led node voltage", node.v_node)?;
        let i_led = ensure_finite("led current", node.i_led)?;

        // Irradiance stage
        let irr = irradiance::instantaneous(params, i_led);
        let irr_state = irradiance::filter_step(params, state.irr_lp, irr, h);
        let irr_lp = ensure_finite("filtered irradiance", irr_state.y)?;

        // Gas dynamics stage
        let ddt_gas = if h > 0.0 {
            (inputs.gas_in - state.gas_in_prev) / h
        } else {
            0.0
        };
        let edge = gas::detect_edge(ddt_gas);
        let (gas_gain, gas_tp1) = match gas::relatch(params, edge, irr) {
            Some((gain, tp1)) => {
                if edge != state.gas_edge {
                    log::debug!(
                        "{}: gas edge {:?} -> {:?}, gain {}, tp1 {}",
                        self.name,
                        state.gas_edge,
                        edge,
                        gain,
                        tp1
                    );
                }
                (gain, tp1)
            }
            None => (state.gas_gain, state.gas_tp1),
        };
        let gas_tp2 = gas::secondary_pole(params, gas_tp1);
        let gas_state = gas::filter_step(
            state.gas,
            gas_gain,
            inputs.gas_in,
            ddt_gas,
            gas_tp1,
            gas_tp2,
            h,
        );
        let conc = ensure_finite("gas concentration", gas_state.y)?.max(0.0);

        // Sensitivity stage
        let sens = sensitivity::response(params, irr_lp, conc);
        clamps += sens.clamps;

        // Resistance synthesis and output
        let (r_base, c) = resistance::base_resistance(params, irr_lp);
        clamps += c;
        let (g_gas, c) = resistance::gas_conductance(params, sens.value, r_base, conc);
        clamps += c;
        let r_drift = resistance::drift_resistance(params, inputs.time - t_start);
        let r_total = ensure_finite(
            "total resistance",
            resistance::total_resistance(r_base, g_gas, r_drift),
        )?;
        let current = ensure_finite("terminal current", inputs.terminal_voltage / r_total)?;

        let stored_edge = if h > 0.0 { edge } else { state.gas_edge };
        let proposed = SensorState {
            time: inputs.time,
            t_start,
            started: true,
            led_vnode: v_node,
            irr_lp: irr_state,
            gas: gas_state,
            gas_gain,
            gas_tp1,
            gas_tp2,
            gas_edge: stored_edge,
            gas_in_prev: inputs.gas_in,
        };

        Ok(Evaluation {
            current,
            state: proposed,
            diagnostics: Diagnostics {
                led_current: i_led,
                led_converged: node.converged,
                irradiance: irr,
                irr_filtered: irr_lp,
                concentration: conc,
                edge,
                r_base,
                sensitivity: sens.value,
                g_gas,
                r_drift,
                r_total,
                clamps,
            },
        })
    }

    /// Commit an accepted step's proposed state.
    ///
    /// The single mutation point of the device; everything else is read-only.
    pub fn commit(&mut self, state: SensorState) {
        self.state = state;
    }

    /// Residual vector of the LED node constraints at a trial point, for an
    /// external Newton iteration over (node voltage, series current, LED
    /// current).
    pub fn led_residuals(
        &self,
        inputs: &EvalInputs,
        v_node: f64,
        i_series: f64,
        i_led: f64,
    ) -> DVector<f64> {
        let (temp_k, _) = floor_positive("temperature", inputs.temp_k, TEMP_FLOOR);
        let vt = thermal_voltage(temp_k);
        let h = if self.state.started {
            (inputs.time - self.state.time).max(0.0)
        } else {
            0.0
        };
        led::residuals(
            &self.params,
            vt,
            inputs.led_voltage,
            self.state.led_vnode,
            h,
            v_node,
            i_series,
            i_led,
        )
    }

    /// Jacobian of [`PhotoMoxSensor::led_residuals`].
    pub fn led_jacobian(&self, inputs: &EvalInputs, v_node: f64) -> DMatrix<f64> {
        let (temp_k, _) = floor_positive("temperature", inputs.temp_k, TEMP_FLOOR);
        let vt = thermal_voltage(temp_k);
        let h = if self.state.started {
            (inputs.time - self.state.time).max(0.0)
        } else {
            0.0
        };
        led::jacobian(&self.params, vt, h, v_node)
    }
}
