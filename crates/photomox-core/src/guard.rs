//! Numeric guard helpers.
//!
//! Transcendental and power-law expressions in the sensor model must stay
//! evaluable across the whole operating range, including near-zero and
//! transiently negative operands. The policy is clamp-then-warn: the value is
//! pulled up to a safe floor, the event is logged, and evaluation continues.
//! Only non-finite results are surfaced as hard errors.

use crate::error::{Error, Result};

/// Minimum conductance (S) stamped in place of a vanishing conductance.
pub const GMIN: f64 = 1e-12;

/// Default floor for operands of `ln` and `powf`.
pub const NUMERIC_FLOOR: f64 = 1e-12;

/// Clamp `value` to at least `floor`, warning when the clamp fires.
///
/// Returns the guarded value and whether clamping occurred.
pub fn floor_positive(quantity: &str, value: f64, floor: f64) -> (f64, bool) {
    if value < floor {
        log::warn!("{quantity} = {value:e} clamped to floor {floor:e}");
        (floor, true)
    } else {
        (value, false)
    }
}

/// Reject NaN and infinite values with a hard error.
pub fn ensure_finite(quantity: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NonFinite { quantity, value })
    }
}
