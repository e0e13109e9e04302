//! Notifications published by the coordinator after each state mutation.

use rescuear_core::geometry::Pose;
use rescuear_core::sensor::TrackingQuality;
use rescuear_pose::domain::transition::ActiveTransition;
use rescuear_procedure::application::query_handlers::SequencerView;
use rescuear_procedure::domain::events::StepChanged;
use serde::Serialize;
use uuid::Uuid;

/// Events for UI labels, the renderer and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresentationEvent {
    /// The session started on the first step.
    SessionStarted {
        /// The sequencer on step 0.
        sequencer: SequencerView,
    },
    /// The sequencer moved forward.
    StepChanged {
        /// The change.
        change: StepChanged,
        /// The command that caused it.
        correlation_id: Uuid,
    },
    /// Narration was handed to the speech engine.
    NarrationRequested {
        /// The utterance.
        utterance_id: Uuid,
        /// Its text.
        text: String,
    },
    /// Narration played to the end.
    NarrationFinished {
        /// The utterance.
        utterance_id: Uuid,
    },
    /// The model was placed and anchored.
    ModelPlaced {
        /// Where.
        pose: Pose,
    },
    /// A pose transition started; the renderer animates it.
    PoseTransitionStarted {
        /// The running transition.
        transition: ActiveTransition,
    },
    /// A pose transition finished.
    PoseSettled {
        /// The transition.
        transition_id: Uuid,
        /// The new rest pose.
        pose: Pose,
    },
    /// Tracking quality changed.
    TrackingQualityChanged {
        /// New quality.
        quality: TrackingQuality,
    },
    /// The session is over.
    SessionEnded,
}
