//! Domain error types.
//!
//! Degraded world tracking is deliberately absent: it is reported as a
//! `TrackingQuality` state, never as an error.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A validation error in domain logic or authored content.
    #[error("validation error: {0}")]
    Validation(String),

    /// The 3D model asset could not be loaded; the session runs narration-only.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// A pose operation required an anchored model.
    #[error("model is not anchored")]
    ModelNotAnchored,

    /// A pose transition was requested while another one is still running.
    #[error("pose transition rejected: transition {in_flight} is still running")]
    TransitionRejected {
        /// The transition that is still in flight.
        in_flight: Uuid,
    },

    /// The speech engine could not produce audio.
    #[error("narration failure: {0}")]
    NarrationFailure(String),

    /// An infrastructure error (file access, decoding).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
