//! In-memory aggregate abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// A state machine owned by a single writer that records the events its
/// commands produce until the owner takes them.
///
/// Nothing is persisted: state changes as the events are produced, and the
/// pending list exists only so the owner can relay them.
pub trait AggregateRoot: Send + Sync {
    /// Events this aggregate produces.
    type Event: DomainEvent;

    /// Aggregate identifier, stamped on every event.
    fn aggregate_id(&self) -> Uuid;

    /// Number of events produced so far.
    fn version(&self) -> i64;

    /// Events produced since the last [`take_pending_events`](Self::take_pending_events).
    fn pending_events(&self) -> &[Self::Event];

    /// Removes and returns the pending events, oldest first.
    fn take_pending_events(&mut self) -> Vec<Self::Event>;
}
