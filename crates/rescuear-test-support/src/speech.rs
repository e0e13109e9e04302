//! Recording and failing speech engines.

use std::sync::Mutex;

use rescuear_core::error::DomainError;
use rescuear_core::speech::{SpeechBackend, Utterance};
use uuid::Uuid;

/// A speech backend that records every `begin` and `stop_immediately` call
/// and always accepts utterances.
#[derive(Debug, Default)]
pub struct RecordingSpeechBackend {
    begun: Mutex<Vec<Utterance>>,
    stopped: Mutex<Vec<Uuid>>,
}

impl RecordingSpeechBackend {
    /// Create an empty recording backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every utterance passed to `begin`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn begun(&self) -> Vec<Utterance> {
        self.begun.lock().unwrap().clone()
    }

    /// Returns the texts of every utterance passed to `begin`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn spoken_texts(&self) -> Vec<String> {
        self.begun
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.request.text.clone())
            .collect()
    }

    /// Returns the ids of every utterance that was hard-stopped, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn stopped(&self) -> Vec<Uuid> {
        self.stopped.lock().unwrap().clone()
    }
}

impl SpeechBackend for RecordingSpeechBackend {
    fn begin(&self, utterance: &Utterance) -> Result<(), DomainError> {
        self.begun.lock().unwrap().push(utterance.clone());
        Ok(())
    }

    fn stop_immediately(&self, utterance_id: Uuid) {
        self.stopped.lock().unwrap().push(utterance_id);
    }
}

/// A speech backend whose engine is permanently broken. Useful for testing
/// that narration failures never reach sequencing logic.
#[derive(Debug)]
pub struct FailingSpeechBackend;

impl SpeechBackend for FailingSpeechBackend {
    fn begin(&self, _utterance: &Utterance) -> Result<(), DomainError> {
        Err(DomainError::NarrationFailure("audio session unavailable".into()))
    }

    fn stop_immediately(&self, _utterance_id: Uuid) {}
}
