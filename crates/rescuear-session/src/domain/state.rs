//! Session state.

use rescuear_core::sensor::TrackingQuality;
use serde::Serialize;
use uuid::Uuid;

/// Authoritative state of one guided session.
///
/// Only the presentation coordinator writes it; everyone else reads
/// published snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    /// Session identifier.
    pub session_id: Uuid,
    /// Active step; stays on the last step once the procedure completes.
    pub current_step_index: usize,
    /// Latest tracking quality reported by the tracking session.
    pub tracking_quality: TrackingQuality,
    /// True once the model has been placed.
    pub model_anchored: bool,
    /// True once the sequencer has moved past the last step.
    pub procedure_completed: bool,
}

impl SessionState {
    /// State at session start.
    #[must_use]
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            current_step_index: 0,
            tracking_quality: TrackingQuality::NotAvailable,
            model_anchored: false,
            procedure_completed: false,
        }
    }
}
