//! Fan-out of presentation events.

use tokio::sync::broadcast;

use crate::domain::events::PresentationEvent;

/// Distributes [`PresentationEvent`]s to any number of subscribers.
///
/// Publishing never blocks: a subscriber that falls more than `capacity`
/// events behind sees a `Lagged` error and skips ahead.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PresentationEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PresentationEvent> {
        self.tx.subscribe()
    }

    /// Publishes `event`. Having no subscribers is fine.
    pub fn emit_lossy(&self, event: PresentationEvent) {
        let _ = self.tx.send(event);
    }

    /// Current number of subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured per-subscriber buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_lossy_without_subscribers_does_not_fail() {
        let bus = EventBus::new(8);

        bus.emit_lossy(PresentationEvent::SessionEnded);

        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_subscribers_receive_events_in_order() {
        // Arrange
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        // Act
        bus.emit_lossy(PresentationEvent::TrackingQualityChanged {
            quality: rescuear_core::sensor::TrackingQuality::Limited,
        });
        bus.emit_lossy(PresentationEvent::SessionEnded);

        // Assert
        assert!(matches!(
            rx.try_recv(),
            Ok(PresentationEvent::TrackingQualityChanged { .. })
        ));
        assert_eq!(rx.try_recv().unwrap(), PresentationEvent::SessionEnded);
        assert_eq!(bus.capacity(), 8);
    }
}
