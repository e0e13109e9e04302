//! Event envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope fields shared by every domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Dotted type name, e.g. `procedure.step_changed`.
    pub event_type: String,
    /// Aggregate that produced the event.
    pub aggregate_id: Uuid,
    /// Position of the event within its aggregate, starting at 1.
    pub sequence_number: i64,
    /// The command that produced the event.
    pub correlation_id: Uuid,
    /// When it happened, according to the injected clock.
    pub occurred_at: DateTime<Utc>,
}

/// A domain event, loggable as JSON.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Dotted type name.
    fn event_type(&self) -> &'static str;

    /// JSON payload for structured logs.
    fn to_payload(&self) -> serde_json::Value;

    /// Envelope fields.
    fn metadata(&self) -> &EventMetadata;
}
