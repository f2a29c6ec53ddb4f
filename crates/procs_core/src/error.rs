//! Error types for the procs engine.
//!
//! Only configuration mistakes and broken address arithmetic surface as
//! errors. Misbehaving organisms are handled by killing them, never by
//! returning an error to the driver.

use thiserror::Error;

/// Main error type for engine operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A configuration value was out of range at construction time
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A raw core address fell outside `[0, size)`
    #[error("Core address {address} out of range for core of size {size}")]
    OutOfRange { address: usize, size: usize },

    /// A process must occupy at least one cell
    #[error("Process length must be positive")]
    EmptyProcess,
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Returns `InvalidConfig` with `msg` unless `condition` holds.
pub(crate) fn ensure_config(condition: bool, msg: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(CoreError::config(msg))
    }
}
