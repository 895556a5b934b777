//! Photo-activated metal-oxide gas sensor model for Photomox.
//!
//! The sensor is a two-terminal variable resistor whose value follows a
//! driving LED's optical output, the history of an ambient gas signal, and
//! slow aging drift. The model is organized as a feed-forward chain of
//! stages:
//! - LED electro-optical conversion (implicit RC/diode node)
//! - Irradiance mapping with first-order inertia
//! - Light-only base resistance (power law)
//! - Edge-latched, irradiance-dependent second-order gas dynamics
//! - Log-normal sensitivity response
//! - Resistance synthesis with linear drift and Ohmic output
//!
//! The surrounding circuit solver owns time-stepping and nonlinear
//! iteration; evaluation here is pure and state advances only on committed
//! steps.

pub mod error;
pub mod gas;
pub mod irradiance;
pub mod led;
pub mod params;
pub mod resistance;
pub mod sensitivity;
pub mod sensor;
pub mod state;
pub mod waveforms;

pub use error::{Error, Result};
pub use gas::GasEdge;
pub use led::NodeCriteria;
pub use params::SensorParams;
pub use sensor::{Diagnostics, EvalInputs, Evaluation, PhotoMoxSensor};
pub use state::SensorState;
pub use waveforms::Waveform;
