//! Narration status.

use serde::Serialize;
use uuid::Uuid;

/// What the speech engine is doing from the queue's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NarrationStatus {
    /// Nothing in flight.
    #[default]
    Idle,
    /// Handed to the engine, audio not confirmed yet.
    Pending {
        /// The utterance.
        utterance_id: Uuid,
        /// Its text.
        text: String,
    },
    /// The engine reported audio playing.
    Speaking {
        /// The utterance.
        utterance_id: Uuid,
        /// Its text.
        text: String,
    },
}

impl NarrationStatus {
    /// The in-flight utterance, if any.
    #[must_use]
    pub fn utterance_id(&self) -> Option<Uuid> {
        match self {
            Self::Idle => None,
            Self::Pending { utterance_id, .. } | Self::Speaking { utterance_id, .. } => {
                Some(*utterance_id)
            }
        }
    }

    /// The in-flight text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Pending { text, .. } | Self::Speaking { text, .. } => Some(text),
        }
    }

    /// Returns true while an utterance is in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
