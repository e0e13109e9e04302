//! Tracking frames and the pure frame-assembly step.

use std::time::Duration;

use rescuear_core::geometry::Pose;
use rescuear_core::sensor::{DetectedSurface, SensorSample, TrackingQuality};

use super::options::TrackingOptions;

/// A published snapshot of world tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingFrame {
    /// 1-based position of this frame in the session.
    pub sequence: u64,
    /// Sensor time since tracking started.
    pub timestamp: Duration,
    /// Camera transform in world space.
    pub camera_transform: Pose,
    /// Surfaces matching the requested plane detection.
    pub detected_surfaces: Vec<DetectedSurface>,
    /// Quality of this estimate.
    pub quality: TrackingQuality,
}

/// Result of ingesting one sensor sample.
#[derive(Debug)]
pub struct IngestedSample {
    /// The frame to publish.
    pub frame: TrackingFrame,
    /// Set when this sample changed the tracking quality.
    pub quality_change: Option<TrackingQuality>,
}

/// Turns raw sensor samples into frames and detects quality changes.
#[derive(Debug)]
pub struct FrameAssembler {
    options: TrackingOptions,
    quality: TrackingQuality,
    frames_assembled: u64,
}

impl FrameAssembler {
    /// Tracking starts out `NotAvailable` until the first sample says otherwise.
    #[must_use]
    pub fn new(options: TrackingOptions) -> Self {
        Self {
            options,
            quality: TrackingQuality::NotAvailable,
            frames_assembled: 0,
        }
    }

    /// Quality reported by the most recent sample.
    #[must_use]
    pub fn quality(&self) -> TrackingQuality {
        self.quality
    }

    /// Builds the next frame from `sample`.
    pub fn ingest(&mut self, sample: SensorSample) -> IngestedSample {
        self.frames_assembled += 1;

        let quality_change = (sample.quality != self.quality).then_some(sample.quality);
        self.quality = sample.quality;

        let plane_detection = self.options.plane_detection;
        let detected_surfaces = sample
            .surfaces
            .into_iter()
            .filter(|surface| plane_detection.accepts(surface.orientation))
            .collect();

        IngestedSample {
            frame: TrackingFrame {
                sequence: self.frames_assembled,
                timestamp: sample.timestamp,
                camera_transform: sample.camera_transform,
                detected_surfaces,
                quality: sample.quality,
            },
            quality_change,
        }
    }
}

#[cfg(test)]
mod tests {
    use rescuear_core::geometry::Vec3;
    use rescuear_core::sensor::SurfaceOrientation;
    use rescuear_test_support::sensor_sample;
    use uuid::Uuid;

    use super::*;
    use crate::domain::options::PlaneDetection;

    fn surface(orientation: SurfaceOrientation) -> DetectedSurface {
        DetectedSurface {
            id: Uuid::new_v4(),
            orientation,
            center: Vec3::new(0.0, -1.2, -1.0),
            extent: (1.5, 1.0),
        }
    }

    #[test]
    fn test_ingest_filters_surfaces_to_requested_planes() {
        // Arrange
        let mut assembler = FrameAssembler::new(TrackingOptions {
            plane_detection: PlaneDetection::Horizontal,
        });
        let floor = surface(SurfaceOrientation::Horizontal);
        let wall = surface(SurfaceOrientation::Vertical);

        // Act
        let ingested = assembler.ingest(sensor_sample(
            16,
            TrackingQuality::Normal,
            vec![floor.clone(), wall],
        ));

        // Assert
        assert_eq!(ingested.frame.detected_surfaces, vec![floor]);
    }

    #[test]
    fn test_ingest_reports_no_surfaces_when_detection_disabled() {
        let mut assembler = FrameAssembler::new(TrackingOptions {
            plane_detection: PlaneDetection::None,
        });

        let ingested = assembler.ingest(sensor_sample(
            16,
            TrackingQuality::Normal,
            vec![surface(SurfaceOrientation::Horizontal)],
        ));

        assert!(ingested.frame.detected_surfaces.is_empty());
    }

    #[test]
    fn test_ingest_reports_quality_only_when_it_changes() {
        // Arrange
        let mut assembler = FrameAssembler::new(TrackingOptions::default());

        // Act
        let changes: Vec<Option<TrackingQuality>> = [
            TrackingQuality::NotAvailable,
            TrackingQuality::Limited,
            TrackingQuality::Limited,
            TrackingQuality::Normal,
            TrackingQuality::Limited,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            assembler
                .ingest(sensor_sample(i as u64 * 16, q, Vec::new()))
                .quality_change
        })
        .collect();

        // Assert
        assert_eq!(
            changes,
            vec![
                None,
                Some(TrackingQuality::Limited),
                None,
                Some(TrackingQuality::Normal),
                Some(TrackingQuality::Limited),
            ]
        );
        assert_eq!(assembler.quality(), TrackingQuality::Limited);
    }

    #[test]
    fn test_ingest_numbers_frames_sequentially() {
        let mut assembler = FrameAssembler::new(TrackingOptions::default());

        let first = assembler.ingest(sensor_sample(0, TrackingQuality::Limited, Vec::new()));
        let second = assembler.ingest(sensor_sample(16, TrackingQuality::Limited, Vec::new()));

        assert_eq!(first.frame.sequence, 1);
        assert_eq!(second.frame.sequence, 2);
        assert_eq!(second.frame.timestamp, Duration::from_millis(16));
    }
}
