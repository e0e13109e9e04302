//! The narration queue.

use std::sync::Arc;

use rescuear_core::speech::{NarrationRequest, SpeechBackend, Utterance, UtteranceEvent, VoiceSettings};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::status::NarrationStatus;

/// Serializes spoken output over a [`SpeechBackend`].
///
/// There is no pending buffer: only the most recent [`speak`](Self::speak)
/// matters and superseded requests are dropped.
pub struct NarrationQueue {
    backend: Arc<dyn SpeechBackend>,
    voice: VoiceSettings,
    status: NarrationStatus,
    last_completed: Option<Uuid>,
}

impl std::fmt::Debug for NarrationQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrationQueue")
            .field("voice", &self.voice)
            .field("status", &self.status)
            .field("last_completed", &self.last_completed)
            .finish_non_exhaustive()
    }
}

impl NarrationQueue {
    /// Creates a queue speaking through `backend` with `voice`.
    #[must_use]
    pub fn new(backend: Arc<dyn SpeechBackend>, voice: VoiceSettings) -> Self {
        Self {
            backend,
            voice,
            status: NarrationStatus::Idle,
            last_completed: None,
        }
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> &NarrationStatus {
        &self.status
    }

    /// Returns true while an utterance is in flight.
    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.status.is_active()
    }

    /// The most recent utterance that played to the end.
    #[must_use]
    pub fn last_completed(&self) -> Option<Uuid> {
        self.last_completed
    }

    /// Voice used for new utterances.
    #[must_use]
    pub fn voice(&self) -> &VoiceSettings {
        &self.voice
    }

    /// Speaks `text`, hard-stopping any utterance in flight first.
    ///
    /// Returns the id of the accepted utterance, or `None` if the text was
    /// blank or the engine refused it. Engine failures are logged only.
    pub fn speak(&mut self, text: impl Into<String>) -> Option<Uuid> {
        let text = text.into();
        if text.trim().is_empty() {
            debug!("dropping blank narration request");
            return None;
        }

        if let Some(current) = self.status.utterance_id() {
            self.backend.stop_immediately(current);
            info!(utterance_id = %current, "narration superseded");
            self.status = NarrationStatus::Idle;
        }

        let utterance = Utterance {
            id: Uuid::new_v4(),
            request: NarrationRequest { text },
            voice: self.voice.clone(),
        };

        match self.backend.begin(&utterance) {
            Ok(()) => {
                info!(utterance_id = %utterance.id, text = %utterance.request.text, "narration started");
                self.status = NarrationStatus::Pending {
                    utterance_id: utterance.id,
                    text: utterance.request.text,
                };
                Some(utterance.id)
            }
            Err(e) => {
                warn!(error = %e, "narration failed; continuing without audio");
                None
            }
        }
    }

    /// Hard-stops the utterance in flight, if any.
    pub fn silence(&mut self) {
        if let Some(current) = self.status.utterance_id() {
            self.backend.stop_immediately(current);
            info!(utterance_id = %current, "narration silenced");
            self.status = NarrationStatus::Idle;
        }
    }

    /// Applies a progress event from the speech engine.
    ///
    /// Events about utterances other than the one in flight (typically late
    /// notifications for a superseded utterance) are ignored. Returns the id
    /// of the utterance that just finished, if any.
    pub fn on_utterance_event(&mut self, event: &UtteranceEvent) -> Option<Uuid> {
        let utterance_id = event.utterance_id();
        if self.status.utterance_id() != Some(utterance_id) {
            debug!(%utterance_id, ?event, "ignoring event for a superseded utterance");
            return None;
        }

        match event {
            UtteranceEvent::Started { .. } => {
                self.status = match std::mem::take(&mut self.status) {
                    NarrationStatus::Pending { utterance_id, text } => {
                        NarrationStatus::Speaking { utterance_id, text }
                    }
                    other => other,
                };
                None
            }
            UtteranceEvent::Finished { .. } => {
                self.status = NarrationStatus::Idle;
                self.last_completed = Some(utterance_id);
                debug!(%utterance_id, "narration finished");
                Some(utterance_id)
            }
            UtteranceEvent::Failed { reason, .. } => {
                warn!(%utterance_id, %reason, "speech engine dropped utterance");
                self.status = NarrationStatus::Idle;
                None
            }
        }
    }
}
