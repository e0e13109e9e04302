//! Speech synthesis port.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// A request to vocalize text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationRequest {
    /// The text to speak.
    pub text: String,
}

/// Voice parameters passed to the speech engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// BCP-47 language tag.
    pub language: String,
    /// Speaking rate in `[0.0, 1.0]`, 0.5 being the engine default.
    pub rate: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            language: "en-US".to_owned(),
            rate: 0.5,
        }
    }
}

/// A single utterance handed to the speech engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Identifier the engine reports back in [`UtteranceEvent`]s.
    pub id: Uuid,
    /// What to say.
    pub request: NarrationRequest,
    /// How to say it.
    pub voice: VoiceSettings,
}

/// Progress notifications raised by the speech engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UtteranceEvent {
    /// Audio for the utterance started playing.
    Started {
        /// The utterance.
        utterance_id: Uuid,
    },
    /// The utterance played to the end.
    Finished {
        /// The utterance.
        utterance_id: Uuid,
    },
    /// The engine gave up on the utterance.
    Failed {
        /// The utterance.
        utterance_id: Uuid,
        /// Engine-provided reason.
        reason: String,
    },
}

impl UtteranceEvent {
    /// The utterance this event refers to.
    #[must_use]
    pub fn utterance_id(&self) -> Uuid {
        match self {
            Self::Started { utterance_id }
            | Self::Finished { utterance_id }
            | Self::Failed { utterance_id, .. } => *utterance_id,
        }
    }
}

/// Speech engine abstraction.
///
/// Both calls must return without waiting for audio: `begin` queues playback,
/// `stop_immediately` silences the utterance before returning.
pub trait SpeechBackend: Send + Sync {
    /// Starts speaking `utterance`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NarrationFailure` if the engine cannot produce
    /// audio for the utterance.
    fn begin(&self, utterance: &Utterance) -> Result<(), DomainError>;

    /// Hard-stops the given utterance. Stopping an utterance that already
    /// finished is a no-op.
    fn stop_immediately(&self, utterance_id: Uuid);
}
