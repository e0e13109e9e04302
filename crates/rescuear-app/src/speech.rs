//! Console speech engine.
//!
//! Stands in for a platform synthesizer: utterances are written to the log
//! and "finish" after roughly the time it would take to say them aloud.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rescuear_core::error::DomainError;
use rescuear_core::speech::{SpeechBackend, Utterance, UtteranceEvent};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Receives engine progress; usually forwards into the session inbox.
pub type UtteranceSink = Arc<dyn Fn(UtteranceEvent) + Send + Sync>;

const MIN_UTTERANCE: Duration = Duration::from_millis(400);

/// Words per second at rate 1.0.
const MAX_WORDS_PER_SECOND: f32 = 6.0;

/// Rough speaking time for `text` at `rate`.
#[must_use]
pub fn estimated_duration(text: &str, rate: f32) -> Duration {
    #[allow(clippy::cast_precision_loss)]
    let words = text.split_whitespace().count() as f32;
    let words_per_second = (MAX_WORDS_PER_SECOND * rate).max(0.5);
    Duration::from_secs_f32(words / words_per_second).max(MIN_UTTERANCE)
}

/// A [`SpeechBackend`] that logs instead of producing audio.
pub struct ConsoleSpeechBackend {
    runtime: Handle,
    sink: UtteranceSink,
    playing: Mutex<HashMap<Uuid, JoinHandle<()>>>,
}

impl std::fmt::Debug for ConsoleSpeechBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSpeechBackend").finish_non_exhaustive()
    }
}

impl ConsoleSpeechBackend {
    /// Creates a backend that runs its playback timers on `runtime` and
    /// reports progress to `sink`.
    #[must_use]
    pub fn new(runtime: Handle, sink: UtteranceSink) -> Self {
        Self {
            runtime,
            sink,
            playing: Mutex::new(HashMap::new()),
        }
    }
}

impl SpeechBackend for ConsoleSpeechBackend {
    fn begin(&self, utterance: &Utterance) -> Result<(), DomainError> {
        let mut playing = self
            .playing
            .lock()
            .map_err(|e| DomainError::NarrationFailure(format!("playback table poisoned: {e}")))?;
        playing.retain(|_, task| !task.is_finished());

        let utterance_id = utterance.id;
        let duration = estimated_duration(&utterance.request.text, utterance.voice.rate);
        info!(
            %utterance_id,
            language = %utterance.voice.language,
            text = %utterance.request.text,
            "speaking"
        );

        (self.sink)(UtteranceEvent::Started { utterance_id });
        let sink = Arc::clone(&self.sink);
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            sink(UtteranceEvent::Finished { utterance_id });
        });
        playing.insert(utterance_id, task);
        Ok(())
    }

    fn stop_immediately(&self, utterance_id: Uuid) {
        match self.playing.lock() {
            Ok(mut playing) => {
                if let Some(task) = playing.remove(&utterance_id) {
                    task.abort();
                    debug!(%utterance_id, "utterance stopped");
                }
            }
            Err(e) => warn!(%utterance_id, error = %e, "cannot stop utterance"),
        }
    }
}
