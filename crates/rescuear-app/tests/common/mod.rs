//! Shared helpers for host integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use rescuear_app::session::{RunningSession, SessionParts};
use rescuear_core::clock::Clock;
use rescuear_core::speech::{SpeechBackend, VoiceSettings};
use rescuear_pose::domain::model::ModelHandle;
use rescuear_procedure::domain::procedure::Procedure;
use rescuear_session::application::handle::session_channel;
use rescuear_session::domain::events::PresentationEvent;
use rescuear_test_support::FixedClock;
use tokio::sync::broadcast;

/// The three-step walkthrough used across scenarios.
pub const SCENARIO: [&str; 3] = [
    "Check responsiveness.",
    "Call for help.",
    "Begin compressions.",
];

/// Fixed timestamp used across all integration tests.
pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::morning())
}

pub fn scenario_procedure() -> Arc<Procedure> {
    Arc::new(Procedure::from_instructions("Scenario", SCENARIO).unwrap())
}

/// Spawn a coordinator for the scenario procedure.
pub fn spawn_session(speech: Arc<dyn SpeechBackend>, model: Option<ModelHandle>) -> RunningSession {
    let (handle, inbox) = session_channel();
    RunningSession::spawn(
        SessionParts {
            procedure: scenario_procedure(),
            model,
            speech,
            voice: VoiceSettings::default(),
            clock: fixed_clock(),
        },
        handle,
        inbox,
    )
}

/// Receive the next event, failing the test if none arrives in time.
pub async fn next_event(events: &mut broadcast::Receiver<PresentationEvent>) -> PresentationEvent {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for presentation event")
        .expect("presentation event bus closed")
}

/// Skip events until one matches `predicate`.
pub async fn wait_for<F>(
    events: &mut broadcast::Receiver<PresentationEvent>,
    predicate: F,
) -> PresentationEvent
where
    F: Fn(&PresentationEvent) -> bool,
{
    loop {
        let event = next_event(events).await;
        if predicate(&event) {
            return event;
        }
    }
}
