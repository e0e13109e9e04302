//! Pinned clock for event timestamps.

use chrono::{DateTime, TimeZone, Utc};
use rescuear_core::clock::Clock;

/// Returns the same instant on every call.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Pinned to 2026-01-15 10:00 UTC.
    #[must_use]
    pub fn morning() -> Self {
        Self(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
