//! Scripted sensor feeds.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use rescuear_core::geometry::Pose;
use rescuear_core::sensor::{DetectedSurface, SensorFeed, SensorSample, TrackingQuality};

/// A sensor feed that replays a fixed list of samples and then reports
/// sensor teardown, or stays silent if held open.
#[derive(Debug, Default)]
pub struct ScriptedSensorFeed {
    samples: VecDeque<SensorSample>,
    held_open: bool,
}

impl ScriptedSensorFeed {
    /// Create a feed that yields `samples` in order.
    #[must_use]
    pub fn new(samples: Vec<SensorSample>) -> Self {
        Self {
            samples: samples.into(),
            held_open: false,
        }
    }

    /// Keeps the sensor running after the script: the feed never ends on
    /// its own, so only stopping the session tears it down.
    #[must_use]
    pub fn held_open(mut self) -> Self {
        self.held_open = true;
        self
    }
}

#[async_trait]
impl SensorFeed for ScriptedSensorFeed {
    async fn next_sample(&mut self) -> Option<SensorSample> {
        match self.samples.pop_front() {
            Some(sample) => Some(sample),
            None if self.held_open => std::future::pending().await,
            None => None,
        }
    }
}

/// Builds a sample with an identity camera transform.
#[must_use]
pub fn sensor_sample(
    millis: u64,
    quality: TrackingQuality,
    surfaces: Vec<DetectedSurface>,
) -> SensorSample {
    SensorSample {
        timestamp: Duration::from_millis(millis),
        camera_transform: Pose::default(),
        surfaces,
        quality,
    }
}
