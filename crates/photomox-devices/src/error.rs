//! Error types for photomox-devices.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid device parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    NonFinite(#[from] photomox_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
