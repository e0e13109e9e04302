//! Tracking configuration.

use rescuear_core::sensor::SurfaceOrientation;
use serde::{Deserialize, Serialize};

/// Which planar surfaces the session asks the sensor subsystem to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneDetection {
    /// Surfaces are not reported.
    None,
    /// Floors and tables only.
    #[default]
    Horizontal,
    /// Walls only.
    Vertical,
    /// Every surface.
    Both,
}

impl PlaneDetection {
    /// Returns true if surfaces of `orientation` were requested.
    #[must_use]
    pub fn accepts(self, orientation: SurfaceOrientation) -> bool {
        matches!(
            (self, orientation),
            (Self::Both, _)
                | (Self::Horizontal, SurfaceOrientation::Horizontal)
                | (Self::Vertical, SurfaceOrientation::Vertical)
        )
    }
}

impl std::str::FromStr for PlaneDetection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "unknown plane detection `{other}` (expected none, horizontal, vertical or both)"
            )),
        }
    }
}

/// Options passed to [`crate::application::session::TrackingSession::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackingOptions {
    /// Requested plane detection.
    pub plane_detection: PlaneDetection,
}
