//! Wall-clock source for event timestamps.
//!
//! Sequencer events carry an `occurred_at` stamp. Taking it from an injected
//! [`Clock`] keeps the stamp reproducible in tests.

use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Source of the current UTC time.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the host's real-time clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Lets a shared clock stand wherever a `&dyn Clock` is expected.
impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_clock_delegates_to_inner_clock() {
        let shared: Arc<dyn Clock> = Arc::new(SystemClock);
        let before = Utc::now();

        let now = shared.now();

        assert!(now >= before);
        assert!(now <= Utc::now());
    }
}
