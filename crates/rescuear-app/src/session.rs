//! Session assembly.

use std::sync::Arc;

use rescuear_core::clock::Clock;
use rescuear_core::speech::{SpeechBackend, VoiceSettings};
use rescuear_narration::application::queue::NarrationQueue;
use rescuear_pose::application::controller::ModelPoseController;
use rescuear_pose::domain::model::ModelHandle;
use rescuear_procedure::application::loader::load_procedure;
use rescuear_procedure::domain::procedure::Procedure;
use rescuear_session::application::coordinator::PresentationCoordinator;
use rescuear_session::application::handle::{SessionHandle, SessionInbox};
use rescuear_session::domain::events::PresentationEvent;
use rescuear_session::domain::state::SessionState;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::AppError;

/// Loads the configured procedure, or the built-in CPR procedure when no
/// file is configured.
///
/// # Errors
///
/// Returns `AppError::Procedure` if the configured file cannot be read or is
/// invalid.
pub fn resolve_procedure(config: &AppConfig) -> Result<Procedure, AppError> {
    match &config.procedure_path {
        Some(path) => Ok(load_procedure(path)?),
        None => {
            info!("no procedure configured; using built-in CPR procedure");
            Ok(Procedure::cpr_default())
        }
    }
}

/// Everything needed to build a coordinator.
pub struct SessionParts {
    /// Procedure to run.
    pub procedure: Arc<Procedure>,
    /// Loaded model, if any.
    pub model: Option<ModelHandle>,
    /// Speech engine.
    pub speech: Arc<dyn SpeechBackend>,
    /// Narration voice.
    pub voice: VoiceSettings,
    /// Event timestamp source.
    pub clock: Arc<dyn Clock>,
}

/// A coordinator running on its own task.
#[derive(Debug)]
pub struct RunningSession {
    /// Sends inputs to the coordinator.
    pub handle: SessionHandle,
    /// Presentation events, subscribed before the first input was handled.
    pub events: broadcast::Receiver<PresentationEvent>,
    /// State snapshots.
    pub state: watch::Receiver<SessionState>,
    task: JoinHandle<()>,
}

impl RunningSession {
    /// Builds a coordinator from `parts` and spawns its loop over `inbox`.
    ///
    /// `handle` and `inbox` must come from the same
    /// [`session_channel`](rescuear_session::application::handle::session_channel).
    #[must_use]
    pub fn spawn(parts: SessionParts, handle: SessionHandle, inbox: SessionInbox) -> Self {
        let narration = NarrationQueue::new(parts.speech, parts.voice);
        let pose = ModelPoseController::new(parts.model);
        let coordinator =
            PresentationCoordinator::new(parts.procedure, narration, pose, parts.clock, &handle);
        let events = coordinator.subscribe_events();
        let state = coordinator.watch_state();
        let task = tokio::spawn(coordinator.run(inbox));
        Self {
            handle,
            events,
            state,
            task,
        }
    }

    /// Subscribes another presentation event reader.
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<PresentationEvent> {
        self.events.resubscribe()
    }

    /// Asks the coordinator to stop and waits for it.
    pub async fn shutdown(self) {
        self.handle.shutdown();
        if let Err(e) = self.task.await {
            warn!(error = %e, "coordinator task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rescuear_core::error::DomainError;

    use super::*;

    #[test]
    fn test_resolve_procedure_defaults_to_cpr() {
        let procedure = resolve_procedure(&AppConfig::default()).unwrap();

        assert_eq!(procedure.name(), "Adult CPR");
        assert_eq!(procedure.len(), 5);
    }

    #[test]
    fn test_resolve_procedure_reports_missing_file() {
        let config = AppConfig {
            procedure_path: Some(PathBuf::from("/nonexistent/rescuear/cpr.yaml")),
            ..AppConfig::default()
        };

        let result = resolve_procedure(&config);

        assert!(matches!(
            result,
            Err(AppError::Procedure(DomainError::Infrastructure(_)))
        ));
    }

    #[test]
    fn test_bundled_procedure_file_is_valid() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../procedures/cpr.yaml");
        let config = AppConfig {
            procedure_path: Some(path),
            ..AppConfig::default()
        };

        let procedure = resolve_procedure(&config).unwrap();

        assert_eq!(procedure.len(), 5);
        assert!(procedure.steps().iter().any(|step| step.pose_action.is_some()));
    }
}
