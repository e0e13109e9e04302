//! World-tracking sensor port.
//!
//! The camera/IMU fusion subsystem is external. It hands the core a stream
//! of [`SensorSample`]s through the [`SensorFeed`] trait.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Pose, Vec3};

/// Quality of the current world-tracking estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingQuality {
    /// No usable camera pose.
    #[default]
    NotAvailable,
    /// A camera pose exists but is unreliable (initializing, relocalizing,
    /// excessive motion, too few features).
    Limited,
    /// Tracking is fully reliable.
    Normal,
}

impl TrackingQuality {
    /// Returns true while the tracking estimate is degraded.
    #[must_use]
    pub fn is_degraded(self) -> bool {
        self != Self::Normal
    }
}

/// Orientation class of a detected planar surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceOrientation {
    /// Floors, tables.
    Horizontal,
    /// Walls.
    Vertical,
}

/// A planar surface reported by the sensor subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedSurface {
    /// Stable identifier of the surface across frames.
    pub id: Uuid,
    /// Horizontal or vertical.
    pub orientation: SurfaceOrientation,
    /// Surface centre in world space.
    pub center: Vec3,
    /// Width and depth of the surface estimate in metres.
    pub extent: (f32, f32),
}

/// One raw update from the sensor subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSample {
    /// Sensor time since tracking started.
    pub timestamp: Duration,
    /// Camera transform in world space.
    pub camera_transform: Pose,
    /// Every surface the subsystem currently knows about.
    pub surfaces: Vec<DetectedSurface>,
    /// Quality of this estimate.
    pub quality: TrackingQuality,
}

/// Source of sensor samples.
///
/// The feed is infinite while the sensor runs; `None` means the sensor
/// subsystem has been torn down and no further samples will arrive.
#[async_trait]
pub trait SensorFeed: Send {
    /// Waits for the next sample.
    async fn next_sample(&mut self) -> Option<SensorSample>;
}
