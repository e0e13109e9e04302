//! Simulated world-tracking sensor.

use std::time::Duration;

use async_trait::async_trait;
use rescuear_core::geometry::{Pose, Quat, Vec3};
use rescuear_core::sensor::{
    DetectedSurface, SensorFeed, SensorSample, SurfaceOrientation, TrackingQuality,
};
use tokio::time::{Interval, MissedTickBehavior};
use uuid::Uuid;

/// Tracking is unavailable for this long after start.
const INITIALIZING: Duration = Duration::from_millis(500);
/// Then limited until this point.
const RELOCALIZING: Duration = Duration::from_millis(1500);
/// The floor shows up here.
const FLOOR_FOUND: Duration = Duration::from_secs(2);
/// The wall shows up here.
const WALL_FOUND: Duration = Duration::from_secs(3);

/// A [`SensorFeed`] that produces samples at a fixed rate.
///
/// Quality ramps from `NotAvailable` through `Limited` to `Normal`, after
/// which a horizontal floor and then a vertical wall are detected. The
/// camera sways gently so consumers see the transform change.
#[derive(Debug)]
pub struct SimulatedSensor {
    ticker: Interval,
    period: Duration,
    frame: u32,
    limit: Option<u32>,
    floor: DetectedSurface,
    wall: DetectedSurface,
}

impl SimulatedSensor {
    /// Creates a sensor producing `fps` samples per second, forever.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        let period = Duration::from_secs(1) / fps.max(1);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            ticker,
            period,
            frame: 0,
            limit: None,
            floor: DetectedSurface {
                id: Uuid::new_v4(),
                orientation: SurfaceOrientation::Horizontal,
                center: Vec3::new(0.0, -1.2, -1.0),
                extent: (2.0, 2.5),
            },
            wall: DetectedSurface {
                id: Uuid::new_v4(),
                orientation: SurfaceOrientation::Vertical,
                center: Vec3::new(0.0, 0.0, -3.0),
                extent: (3.0, 2.4),
            },
        }
    }

    /// Stops the feed after `frames` samples, as if the sensor were torn
    /// down.
    #[must_use]
    pub fn with_limit(mut self, frames: u32) -> Self {
        self.limit = Some(frames);
        self
    }

    fn sample_at(&self, elapsed: Duration) -> SensorSample {
        let quality = if elapsed < INITIALIZING {
            TrackingQuality::NotAvailable
        } else if elapsed < RELOCALIZING {
            TrackingQuality::Limited
        } else {
            TrackingQuality::Normal
        };

        let mut surfaces = Vec::new();
        if elapsed >= FLOOR_FOUND {
            surfaces.push(self.floor.clone());
        }
        if elapsed >= WALL_FOUND {
            surfaces.push(self.wall.clone());
        }

        let sway = (elapsed.as_secs_f32() * 0.5).sin() * 0.05;
        SensorSample {
            timestamp: elapsed,
            camera_transform: Pose::new(
                Vec3::new(sway, 0.0, 0.0),
                Quat::from_euler(0.0, sway, 0.0),
            ),
            surfaces,
            quality,
        }
    }
}

#[async_trait]
impl SensorFeed for SimulatedSensor {
    async fn next_sample(&mut self) -> Option<SensorSample> {
        if self.limit.is_some_and(|limit| self.frame >= limit) {
            return None;
        }
        self.ticker.tick().await;
        let elapsed = self.period * self.frame;
        self.frame += 1;
        Some(self.sample_at(elapsed))
    }
}
