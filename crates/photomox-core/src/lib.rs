//! Core numeric primitives for Photomox sensor models.
//!
//! This crate provides the foundations shared by the device models:
//! - Physical constants and thermal voltage
//! - Numeric guard helpers (clamp-to-floor, finiteness checks)
//! - First- and second-order low-pass filter states with backward-Euler
//!   stepping, designed for solver-driven integration

pub mod constants;
pub mod error;
pub mod filter;
pub mod guard;

pub use constants::thermal_voltage;
pub use error::{Error, Result};
pub use filter::{FirstOrderLp, SecondOrderLp};
pub use guard::{ensure_finite, floor_positive, GMIN, NUMERIC_FLOOR};
