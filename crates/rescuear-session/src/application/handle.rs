//! Cross-context access to the coordinator.
//!
//! Tracking, speech and UI callbacks may fire on any thread. None of them
//! touch session state directly: they post a [`SessionInput`] through a
//! [`SessionHandle`], and the coordination loop applies inputs one at a time.

use rescuear_core::geometry::Pose;
use rescuear_core::sensor::TrackingQuality;
use rescuear_core::speech::UtteranceEvent;
use rescuear_procedure::domain::commands::AdvanceStep;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::commands::{CompleteProcedure, PlaceModel};
use crate::domain::inputs::SessionInput;

/// Receiving end of the coordinator inbox.
#[derive(Debug)]
pub struct SessionInbox {
    rx: mpsc::UnboundedReceiver<SessionInput>,
}

impl SessionInbox {
    /// Waits for the next input; `None` once every handle is gone.
    pub async fn recv(&mut self) -> Option<SessionInput> {
        self.rx.recv().await
    }

    /// Takes the next input if one is already queued.
    pub fn try_recv(&mut self) -> Option<SessionInput> {
        self.rx.try_recv().ok()
    }
}

/// Cloneable sender of inputs to the coordinator.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionInput>,
}

/// Creates a connected handle and inbox.
#[must_use]
pub fn session_channel() -> (SessionHandle, SessionInbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SessionHandle { tx }, SessionInbox { rx })
}

impl SessionHandle {
    /// Posts `input`. Returns false if the coordinator has already shut down.
    pub fn send(&self, input: SessionInput) -> bool {
        match self.tx.send(input) {
            Ok(()) => true,
            Err(mpsc::error::SendError(input)) => {
                debug!(?input, "coordinator gone; input dropped");
                false
            }
        }
    }

    /// Requests the next step. Returns the command's correlation ID.
    pub fn advance(&self) -> Uuid {
        let correlation_id = Uuid::new_v4();
        self.send(SessionInput::Advance(AdvanceStep { correlation_id }));
        correlation_id
    }

    /// Marks the procedure done. Returns the command's correlation ID.
    pub fn complete(&self) -> Uuid {
        let correlation_id = Uuid::new_v4();
        self.send(SessionInput::Complete(CompleteProcedure { correlation_id }));
        correlation_id
    }

    /// Requests model placement. Returns the command's correlation ID.
    pub fn place_model(&self, initial_pose: Pose) -> Uuid {
        let correlation_id = Uuid::new_v4();
        self.send(SessionInput::PlaceModel(PlaceModel {
            correlation_id,
            initial_pose,
        }));
        correlation_id
    }

    /// Forwards a tracking quality change.
    pub fn tracking_quality_changed(&self, quality: TrackingQuality) {
        self.send(SessionInput::TrackingQualityChanged(quality));
    }

    /// Forwards a speech engine event.
    pub fn utterance_event(&self, event: UtteranceEvent) {
        self.send(SessionInput::Utterance(event));
    }

    /// Reports that a pose transition's duration elapsed.
    pub fn transition_settled(&self, transition_id: Uuid) {
        self.send(SessionInput::TransitionSettled { transition_id });
    }

    /// Ends the session.
    pub fn shutdown(&self) {
        self.send(SessionInput::Shutdown);
    }

    /// Returns true once the coordinator has shut down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub(crate) fn downgrade(&self) -> mpsc::WeakUnboundedSender<SessionInput> {
        self.tx.downgrade()
    }
}
