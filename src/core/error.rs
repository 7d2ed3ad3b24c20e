use thiserror::Error;

use crate::core::types::Address;

#[derive(Error, Debug)]
pub enum SchellingError {
    #[error("Cell at {0} is empty")]
    CellEmpty(Address),

    #[error("Address {addr} is outside a {size}x{size} grid")]
    OutOfBounds { addr: Address, size: usize },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SchellingError>;
