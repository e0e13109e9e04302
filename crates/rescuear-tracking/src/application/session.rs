//! The world tracking session.
//!
//! A `TrackingSession` is configured, then started exactly once over a
//! [`SensorFeed`]. Starting consumes the session, so a stopped session can
//! never be restarted; recovery from degraded tracking shows up as a quality
//! change on the running session instead.

use std::sync::Arc;

use rescuear_core::sensor::{SensorFeed, TrackingQuality};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::frames::{FrameAssembler, TrackingFrame};
use crate::domain::options::TrackingOptions;

/// Latest published frame; `None` until the first sample arrives.
pub type FrameSnapshot = Option<Arc<TrackingFrame>>;

type QualityHandler = Box<dyn Fn(TrackingQuality) + Send + Sync>;

/// A configured, not yet running, tracking session.
pub struct TrackingSession {
    id: Uuid,
    options: TrackingOptions,
    frames: watch::Sender<FrameSnapshot>,
    quality_handlers: Vec<QualityHandler>,
}

impl std::fmt::Debug for TrackingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingSession")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("quality_handlers", &self.quality_handlers.len())
            .finish_non_exhaustive()
    }
}

impl TrackingSession {
    /// Creates a session that will request `options` from the sensor.
    #[must_use]
    pub fn new(options: TrackingOptions) -> Self {
        let (frames, _) = watch::channel(None);
        Self {
            id: Uuid::new_v4(),
            options,
            frames,
            quality_handlers: Vec::new(),
        }
    }

    /// Session identifier used in logs.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Subscribes to frame snapshots.
    ///
    /// Receivers always see whole frames: each publish swaps in a new `Arc`.
    #[must_use]
    pub fn subscribe_frames(&self) -> watch::Receiver<FrameSnapshot> {
        self.frames.subscribe()
    }

    /// Registers a handler invoked on the tracking task whenever quality
    /// changes. Handlers must not block; they are expected to forward the
    /// change to whichever context owns session state.
    #[must_use]
    pub fn on_quality_change<F>(mut self, handler: F) -> Self
    where
        F: Fn(TrackingQuality) + Send + Sync + 'static,
    {
        self.quality_handlers.push(Box::new(handler));
        self
    }

    /// Starts tracking over `feed` on a new task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(self, feed: F) -> TrackingHandle
    where
        F: SensorFeed + 'static,
    {
        let frames = self.frames.subscribe();
        let session_id = self.id;
        info!(%session_id, plane_detection = ?self.options.plane_detection, "world tracking started");

        let task = tokio::spawn(run_tracking_loop(
            session_id,
            feed,
            FrameAssembler::new(self.options),
            self.frames,
            self.quality_handlers,
        ));

        TrackingHandle {
            session_id,
            frames,
            task,
        }
    }
}

/// Handle to a running tracking session.
#[derive(Debug)]
pub struct TrackingHandle {
    session_id: Uuid,
    frames: watch::Receiver<FrameSnapshot>,
    task: JoinHandle<()>,
}

impl TrackingHandle {
    /// Session identifier used in logs.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Subscribes to frame snapshots.
    #[must_use]
    pub fn subscribe_frames(&self) -> watch::Receiver<FrameSnapshot> {
        self.frames.clone()
    }

    /// The most recently published frame. Stays readable after the sensor
    /// stops, so consumers can keep using a stale frame indefinitely.
    #[must_use]
    pub fn latest_frame(&self) -> FrameSnapshot {
        self.frames.borrow().clone()
    }

    /// Returns true once the tracking loop has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Tears the session down without waiting for the sensor.
    pub fn stop(self) {
        info!(session_id = %self.session_id, "world tracking stopped");
        self.task.abort();
    }

    /// Waits until the sensor feed ends.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            if !e.is_cancelled() {
                warn!(session_id = %self.session_id, error = %e, "tracking task failed");
            }
        }
    }
}

async fn run_tracking_loop<F>(
    session_id: Uuid,
    mut feed: F,
    mut assembler: FrameAssembler,
    frames: watch::Sender<FrameSnapshot>,
    quality_handlers: Vec<QualityHandler>,
) where
    F: SensorFeed,
{
    while let Some(sample) = feed.next_sample().await {
        let ingested = assembler.ingest(sample);
        let sequence = ingested.frame.sequence;

        frames.send_replace(Some(Arc::new(ingested.frame)));

        if let Some(quality) = ingested.quality_change {
            if quality.is_degraded() {
                warn!(%session_id, ?quality, sequence, "tracking degraded");
            } else {
                info!(%session_id, ?quality, sequence, "tracking normal");
            }
            for handler in &quality_handlers {
                handler(quality);
            }
        }
    }

    debug!(%session_id, last_quality = ?assembler.quality(), "sensor feed ended");
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use rescuear_core::geometry::Vec3;
    use rescuear_core::sensor::{DetectedSurface, SurfaceOrientation};
    use rescuear_test_support::{ScriptedSensorFeed, sensor_sample};

    use super::*;
    use crate::domain::options::PlaneDetection;

    #[tokio::test]
    async fn test_start_publishes_frames_and_reports_quality_changes() {
        // Arrange
        let changes = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&changes);
        let session = TrackingSession::new(TrackingOptions::default())
            .on_quality_change(move |q| recorded.lock().unwrap().push(q));
        let feed = ScriptedSensorFeed::new(vec![
            sensor_sample(0, TrackingQuality::NotAvailable, Vec::new()),
            sensor_sample(16, TrackingQuality::Limited, Vec::new()),
            sensor_sample(33, TrackingQuality::Normal, Vec::new()),
        ]);

        // Act
        let handle = session.start(feed);
        let frames = handle.subscribe_frames();
        handle.join().await;

        // Assert
        let last = frames.borrow().clone().expect("frame published");
        assert_eq!(last.sequence, 3);
        assert_eq!(last.quality, TrackingQuality::Normal);
        assert_eq!(
            *changes.lock().unwrap(),
            vec![TrackingQuality::Limited, TrackingQuality::Normal]
        );
    }

    #[tokio::test]
    async fn test_last_frame_stays_readable_after_feed_ends() {
        // Arrange
        let floor = DetectedSurface {
            id: Uuid::new_v4(),
            orientation: SurfaceOrientation::Horizontal,
            center: Vec3::new(0.0, -1.4, -1.0),
            extent: (2.0, 2.0),
        };
        let session = TrackingSession::new(TrackingOptions {
            plane_detection: PlaneDetection::Both,
        });
        let frames = session.subscribe_frames();
        let feed = ScriptedSensorFeed::new(vec![sensor_sample(
            16,
            TrackingQuality::Normal,
            vec![floor.clone()],
        )]);

        // Act
        let handle = session.start(feed);
        let mut rx = frames.clone();
        // Errors once the loop drops its sender, i.e. after the feed ended.
        while rx.changed().await.is_ok() {}

        // Assert
        let frame = handle.latest_frame().expect("frame kept after feed ended");
        assert_eq!(frame.sequence, 1);
        assert_eq!(frame.detected_surfaces, vec![floor]);
        assert_eq!(rx.borrow().as_ref(), Some(&frame));
    }

    #[tokio::test]
    async fn test_stop_tears_down_running_feed_and_keeps_last_frame() {
        // Arrange
        let session = TrackingSession::new(TrackingOptions::default());
        let mut frames = session.subscribe_frames();
        let feed = ScriptedSensorFeed::new(vec![sensor_sample(
            16,
            TrackingQuality::Limited,
            Vec::new(),
        )])
        .held_open();
        let handle = session.start(feed);
        frames.changed().await.unwrap();
        assert!(!handle.is_finished());

        // Act
        handle.stop();

        // Assert
        let closed = tokio::time::timeout(Duration::from_secs(5), frames.changed())
            .await
            .expect("tracking loop still running after stop");
        assert!(closed.is_err());
        let last = frames.borrow().clone().expect("stale frame kept");
        assert_eq!(last.sequence, 1);
        assert_eq!(last.quality, TrackingQuality::Limited);
    }

    #[tokio::test]
    async fn test_subscribers_see_none_before_first_sample() {
        let session = TrackingSession::new(TrackingOptions::default());

        let frames = session.subscribe_frames();

        assert!(frames.borrow().is_none());
    }
}
