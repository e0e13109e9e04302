//! Commands.

use uuid::Uuid;

/// A request to change session state, traced end to end by its
/// correlation id.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted type name used in logs.
    fn command_type(&self) -> &'static str;

    /// Correlation id copied onto every event the command produces.
    fn correlation_id(&self) -> Uuid;
}
