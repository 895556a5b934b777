//! Sensor model parameters.
//!
//! All parameters are fixed at construction; nothing here is mutated during a
//! simulation run. Defaults describe a generic UV-LED-driven metal-oxide
//! sensor and are meant as a starting point for fitting against measured
//! devices.

use crate::error::{Error, Result};

/// Photo-activated MOX sensor parameters.
#[derive(Debug, Clone)]
pub struct SensorParams {
    // ========================================
    // LED Electrical Parameters
    // ========================================
    /// LED series resistance (ohms). Default: 100.
    pub led_rs: f64,
    /// LED parallel leakage resistance (ohms). Default: 1e6.
    pub led_rp: f64,
    /// LED parallel capacitance (F). Default: 1e-9.
    pub led_cp: f64,
    /// Diode saturation current (A). Default: 1e-14.
    pub led_is: f64,
    /// Diode ideality factor. Default: 2.0.
    pub led_n: f64,

    // ========================================
    // Irradiance Response
    // ========================================
    /// Irradiance inertia pole time constant (s). Default: 0.1.
    pub irr_tp: f64,
    /// Irradiance filter gain. Default: 1.0.
    pub irr_gain: f64,
    /// Ambient irradiance floor at zero LED current. Default: 1.0.
    pub irr_0: f64,
    /// Irradiance per unit LED current (1/A). Default: 100.
    pub irr_m: f64,

    // ========================================
    // Base Resistance Power Law
    // ========================================
    /// Reference (dark, gas-free) resistance (ohms). Default: 1e5.
    pub sensor_r0: f64,
    /// Gas-conductance power-law exponent. Default: 1.5.
    pub sensor_r: f64,
    /// Irradiance shape coefficient. Default: 0.5.
    pub rbase_alpha: f64,
    /// Irradiance shape exponent. Default: 0.8.
    pub rbase_beta: f64,

    // ========================================
    // Gas Adsorption/Desorption Dynamics
    // ========================================
    /// Filter gain latched on rising concentration. Default: 1.0.
    pub gas_gainon: f64,
    /// Filter gain latched on falling concentration. Default: 0.5.
    pub gas_gainoff: f64,
    /// Fixed ratio of primary to secondary pole time constant. Default: 4.0.
    pub gas_r_t1t2: f64,
    /// Desorption-to-adsorption time-constant ratio. Default: 3.0.
    pub gas_r_onoff: f64,
    /// Irradiance-dependence exponent of the primary pole. Default: 0.5.
    pub gas_t_irr_m: f64,
    /// Primary pole time-constant scale at unit irradiance (s). Default: 10.
    pub gas_t_irr_of: f64,

    // ========================================
    // Sensitivity Bell Curve
    // ========================================
    /// Peak-sensitivity irradiance slope vs. concentration. Default: 1.0.
    pub sens_irrs: f64,
    /// Peak-sensitivity irradiance offset. Default: 1.0.
    pub sens_irro: f64,
    /// Log-normal standard deviation. Default: 0.5.
    pub sens_std: f64,

    // ========================================
    // Aging
    // ========================================
    /// Drift resistance per second of simulated time (ohm/s). Default: 0.01.
    pub drift_coef: f64,
}

impl Default for SensorParams {
    fn default() -> Self {
        Self {
            led_rs: 100.0,
            led_rp: 1e6,
            led_cp: 1e-9,
            led_is: 1e-14,
            led_n: 2.0,
            irr_tp: 0.1,
            irr_gain: 1.0,
            irr_0: 1.0,
            irr_m: 100.0,
            sensor_r0: 1e5,
            sensor_r: 1.5,
            rbase_alpha: 0.5,
            rbase_beta: 0.8,
            gas_gainon: 1.0,
            gas_gainoff: 0.5,
            gas_r_t1t2: 4.0,
            gas_r_onoff: 3.0,
            gas_t_irr_m: 0.5,
            gas_t_irr_of: 10.0,
            sens_irrs: 1.0,
            sens_irro: 1.0,
            sens_std: 0.5,
            drift_coef: 0.01,
        }
    }
}

impl SensorParams {
    /// Validate the physical domain of every parameter.
    ///
    /// Time constants, resistances, capacitance, saturation current, ideality
    /// factor, pole ratios, and the sensitivity standard deviation must be
    /// strictly positive. The drift coefficient must be non-negative. Gains,
    /// slopes, offsets, and exponents may be any finite real.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("led_rs", self.led_rs),
            ("led_rp", self.led_rp),
            ("led_cp", self.led_cp),
            ("led_is", self.led_is),
            ("led_n", self.led_n),
            ("irr_tp", self.irr_tp),
            ("irr_gain", self.irr_gain),
            ("irr_0", self.irr_0),
            ("sensor_r0", self.sensor_r0),
            ("gas_r_t1t2", self.gas_r_t1t2),
            ("gas_r_onoff", self.gas_r_onoff),
            ("gas_t_irr_of", self.gas_t_irr_of),
            ("sens_std", self.sens_std),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(Error::InvalidParameter(format!(
                    "{name} must be strictly positive, got {value}"
                )));
            }
        }

        if !(self.drift_coef >= 0.0) || !self.drift_coef.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "drift_coef must be non-negative, got {}",
                self.drift_coef
            )));
        }

        let finite = [
            ("irr_m", self.irr_m),
            ("sensor_r", self.sensor_r),
            ("rbase_alpha", self.rbase_alpha),
            ("rbase_beta", self.rbase_beta),
            ("gas_gainon", self.gas_gainon),
            ("gas_gainoff", self.gas_gainoff),
            ("gas_t_irr_m", self.gas_t_irr_m),
            ("sens_irrs", self.sens_irrs),
            ("sens_irro", self.sens_irro),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Error::InvalidParameter(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        Ok(())
    }
}
