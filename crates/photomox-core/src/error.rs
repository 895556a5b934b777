//! Error types for photomox-core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("non-finite {quantity}: {value}")]
    NonFinite { quantity: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
