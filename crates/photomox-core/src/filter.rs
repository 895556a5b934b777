//! Low-pass filter states with backward-Euler stepping.
//!
//! These states are advanced by an external integration loop: `step_be`
//! proposes the state after a step of length `h` without mutating the
//! receiver, so speculative solver evaluations can discard proposals freely.
//! Backward Euler is A-stable, which keeps the stiff, widely-spread time
//! constants of the sensor model well behaved at coarse steps.

use num_traits::Float;

/// Single-pole low-pass state: `tau * dy/dt + y = gain * u`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstOrderLp<T> {
    /// Filter output.
    pub y: T,
}

impl<T: Float> FirstOrderLp<T> {
    /// Create a filter state with the given initial output.
    pub fn new(y0: T) -> Self {
        Self { y: y0 }
    }

    /// Propose the state after a backward-Euler step of length `h`.
    ///
    /// A non-positive `h` (trial evaluation at a fixed instant) leaves the
    /// state unchanged.
    pub fn step_be(&self, tau: T, gain: T, input: T, h: T) -> Self {
        if h <= T::zero() {
            return *self;
        }
        Self {
            y: (tau * self.y + h * gain * input) / (tau + h),
        }
    }
}

/// Two-state linear filter tracked as a value and its time derivative:
///
/// ```text
/// dy/dt = r
/// dr/dt = drive - damping * r - stiffness * y
/// ```
///
/// The driving term is supplied per step, so state-dependent coefficients
/// (the sensor's latched gas poles) plug in without rebuilding the filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondOrderLp<T> {
    /// Filter output.
    pub y: T,
    /// Time derivative of the output, carried as an explicit state.
    pub rate: T,
}

impl<T: Float> SecondOrderLp<T> {
    /// Create a filter state at rest at the given output value.
    pub fn new(y0: T) -> Self {
        Self {
            y: y0,
            rate: T::zero(),
        }
    }

    /// Propose the state after a backward-Euler step of length `h`.
    ///
    /// Both coupled first-order equations are discretized implicitly and the
    /// resulting 2x2 linear system is solved in closed form.
    pub fn step_be(&self, damping: T, stiffness: T, drive: T, h: T) -> Self {
        if h <= T::zero() {
            return *self;
        }
        let denom = T::one() + h * damping + h * h * stiffness;
        let rate = (self.rate + h * (drive - stiffness * self.y)) / denom;
        Self {
            y: self.y + h * rate,
            rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_order_zero_step_is_identity() {
        let f = FirstOrderLp::new(3.0_f64);
        assert_eq!(f.step_be(0.5, 1.0, 100.0, 0.0), f);
        assert_eq!(f.step_be(0.5, 1.0, 100.0, -1.0), f);
    }

    #[test]
    fn test_first_order_converges_to_dc_gain() {
        let mut f = FirstOrderLp::new(0.0_f64);
        let (tau, gain, u, h) = (0.1, 2.0, 5.0, 1e-3);
        for _ in 0..10_000 {
            f = f.step_be(tau, gain, u, h);
        }
        assert!(
            (f.y - gain * u).abs() < 1e-6,
            "settled at {} (expected {})",
            f.y,
            gain * u
        );
    }

    #[test]
    fn test_first_order_matches_analytic_response() {
        // Unit step into tau = 1s, gain = 1: y(tau) = 1 - e^-1
        let mut f = FirstOrderLp::new(0.0_f64);
        let h = 1e-4;
        let steps = (1.0 / h) as usize;
        for _ in 0..steps {
            f = f.step_be(1.0, 1.0, 1.0, h);
        }
        let expected = 1.0 - (-1.0_f64).exp();
        assert!(
            (f.y - expected).abs() < 1e-3,
            "y(tau) = {} (expected ≈ {})",
            f.y,
            expected
        );
    }

    #[test]
    fn test_second_order_settles_to_drive_over_stiffness() {
        let mut f = SecondOrderLp::new(0.0_f64);
        let (damping, stiffness, drive, h) = (2.0, 1.0, 4.0, 1e-3);
        for _ in 0..100_000 {
            f = f.step_be(damping, stiffness, drive, h);
        }
        assert!(
            (f.y - drive / stiffness).abs() < 1e-6,
            "settled at {} (expected {})",
            f.y,
            drive / stiffness
        );
        assert!(f.rate.abs() < 1e-9, "rate should vanish: {}", f.rate);
    }

    #[test]
    fn test_second_order_zero_step_is_identity() {
        let f = SecondOrderLp {
            y: 1.0_f64,
            rate: -2.0,
        };
        assert_eq!(f.step_be(1.0, 1.0, 10.0, 0.0), f);
    }

    #[test]
    fn test_second_order_rate_tracks_rise() {
        let f = SecondOrderLp::new(0.0_f64);
        let stepped = f.step_be(1.0, 1.0, 10.0, 1e-3);
        assert!(stepped.rate > 0.0, "positive drive should raise the rate");
        assert!(stepped.y > 0.0);
    }
}
