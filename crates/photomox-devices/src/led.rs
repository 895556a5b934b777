//! LED electro-optical stage.
//!
//! The LED is driven through a series resistance into an internal node that
//! carries a parallel leakage resistance, a parallel capacitance, and the
//! light-emitting junction obeying the Shockley law. The junction current is
//! what produces irradiance downstream.
//!
//! The node is an implicit unknown: [`residuals`]/[`jacobian`] expose the
//! coupled constraint equations for an external Newton iteration, and
//! [`solve_node`] advances the node locally for self-contained evaluation.

use nalgebra::{DMatrix, DVector};
use photomox_core::guard::GMIN;

use crate::params::SensorParams;

/// Convergence criteria for the local node solve.
#[derive(Debug, Clone)]
pub struct NodeCriteria {
    /// Absolute voltage tolerance (V).
    pub v_abstol: f64,
    /// Relative voltage tolerance.
    pub v_reltol: f64,
    /// Maximum iterations before giving up.
    pub max_iterations: usize,
}

impl Default for NodeCriteria {
    fn default() -> Self {
        Self {
            v_abstol: 1e-9,
            v_reltol: 1e-6,
            max_iterations: 100,
        }
    }
}

/// Result of the local node solve.
#[derive(Debug, Clone, Copy)]
pub struct NodeSolution {
    /// Internal node (junction) voltage.
    pub v_node: f64,
    /// Junction current at the solved node voltage.
    pub i_led: f64,
    /// Newton iterations performed.
    pub iterations: usize,
    /// Whether the voltage tolerance was met.
    pub converged: bool,
}

/// Evaluate junction current and small-signal conductance at a voltage.
///
/// Returns (current, conductance) where:
/// - current = Is * (exp(Vj / (n * Vt)) - 1)
/// - conductance = dI/dV = Is / (n * Vt) * exp(Vj / (n * Vt))
///
/// The junction voltage is log-compressed above the critical voltage so exp()
/// cannot overflow, and the conductance is floored at Gmin. Zero and negative
/// junction voltages are safe: the exponential saturates toward -Is.
pub fn junction_current(params: &SensorParams, vj: f64, vt: f64) -> (f64, f64) {
    let nvt = params.led_n * vt;
    let vj_limited = limit_voltage(vj, nvt, params.led_is);

    let exp_term = (vj_limited / nvt).exp();
    let id = params.led_is * (exp_term - 1.0);
    let gd = (params.led_is * exp_term / nvt).max(GMIN);

    (id, gd)
}

/// Voltage limiting to prevent numerical overflow.
///
/// Above the critical voltage the argument is log-compressed, which bounds
/// exp() while preserving monotonicity for Newton convergence.
fn limit_voltage(vj: f64, nvt: f64, is: f64) -> f64 {
    let vcrit = nvt * (nvt / (std::f64::consts::SQRT_2 * is)).ln();

    if vj > vcrit {
        let arg = (vj - vcrit) / nvt;
        vcrit + nvt * (1.0 + arg.ln_1p())
    } else {
        vj
    }
}

/// Residual vector of the node constraint equations at a trial point.
///
/// Unknowns are (node voltage, series current, junction current); the three
/// residuals are the series drop, KCL at the internal node, and the junction
/// law:
///
/// ```text
/// r0 = Iseries - (Vdrive - Vn)/Rs
/// r1 = Iseries - Vn/Rp - Cp*(Vn - Vn_prev)/h - Iled
/// r2 = Iled - Is*(exp(Vn/(n*Vt)) - 1)
/// ```
///
/// For a zero-length step the displacement term is absent.
pub fn residuals(
    params: &SensorParams,
    vt: f64,
    v_drive: f64,
    v_node_prev: f64,
    h: f64,
    v_node: f64,
    i_series: f64,
    i_led: f64,
) -> DVector<f64> {
    let i_cap = if h > 0.0 {
        params.led_cp * (v_node - v_node_prev) / h
    } else {
        0.0
    };
    let (id, _) = junction_current(params, v_node, vt);

    DVector::from_vec(vec![
        i_series - (v_drive - v_node) / params.led_rs,
        i_series - v_node / params.led_rp - i_cap - i_led,
        i_led - id,
    ])
}

/// Jacobian of [`residuals`] with respect to
/// (node voltage, series current, junction current).
pub fn jacobian(params: &SensorParams, vt: f64, h: f64, v_node: f64) -> DMatrix<f64> {
    let g_cap = if h > 0.0 { params.led_cp / h } else { 0.0 };
    let (_, gd) = junction_current(params, v_node, vt);

    DMatrix::from_row_slice(
        3,
        3,
        &[
            1.0 / params.led_rs,
            1.0,
            0.0,
            -1.0 / params.led_rp - g_cap,
            1.0,
            -1.0,
            -gd,
            0.0,
            1.0,
        ],
    )
}

/// Advance the internal node over a step with a damped scalar Newton solve.
///
/// The series and junction currents are eliminated, leaving a single KCL
/// equation in the node voltage. The derivative is bounded away from zero by
/// the series conductance, so the iteration has no singular points.
pub fn solve_node(
    params: &SensorParams,
    vt: f64,
    v_drive: f64,
    v_node_prev: f64,
    h: f64,
    criteria: &NodeCriteria,
) -> NodeSolution {
    let g_cap = if h > 0.0 { params.led_cp / h } else { 0.0 };
    let mut v = v_node_prev;
    let mut id = 0.0;

    for iteration in 0..criteria.max_iterations {
        let (id_now, gd) = junction_current(params, v, vt);
        id = id_now;

        let f = (v_drive - v) / params.led_rs - v / params.led_rp
            - g_cap * (v - v_node_prev)
            - id_now;
        let df = -1.0 / params.led_rs - 1.0 / params.led_rp - g_cap - gd;

        let v_new = v - f / df;
        let tol = criteria.v_abstol + criteria.v_reltol * v.abs().max(v_new.abs());
        let converged = (v_new - v).abs() <= tol;
        v = v_new;

        if converged {
            let (id_final, _) = junction_current(params, v, vt);
            return NodeSolution {
                v_node: v,
                i_led: id_final,
                iterations: iteration + 1,
                converged: true,
            };
        }
    }

    NodeSolution {
        v_node: v,
        i_led: id,
        iterations: criteria.max_iterations,
        converged: false,
    }
}
