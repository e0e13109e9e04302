//! RescueAR — host error types.

use rescuear_core::error::DomainError;
use thiserror::Error;

/// Startup errors for the console host.
///
/// Anything that goes wrong once the session is running is logged where it
/// happens and never reaches this type.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable holds an invalid value.
    #[error("configuration error: {0}")]
    Config(String),

    /// The procedure file could not be loaded.
    #[error("procedure error: {0}")]
    Procedure(#[from] DomainError),

    /// Console I/O failed.
    #[error("console error: {0}")]
    Io(#[from] std::io::Error),
}
