//! The presentation coordinator.
//!
//! All session mutation happens here, one input at a time, on whichever task
//! runs [`PresentationCoordinator::run`]. Within one input the state change
//! completes, the snapshot and events are published, and any narration
//! request is issued before the next input is looked at.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use rescuear_core::clock::Clock;
use rescuear_core::command::Command;
use rescuear_core::error::DomainError;
use rescuear_core::event::DomainEvent;
use rescuear_core::geometry::Pose;
use rescuear_core::sensor::TrackingQuality;
use rescuear_core::speech::UtteranceEvent;
use rescuear_narration::application::queue::NarrationQueue;
use rescuear_pose::application::controller::ModelPoseController;
use rescuear_pose::domain::transition::PoseTransition;
use rescuear_procedure::application::command_handlers::handle_advance_step;
use rescuear_procedure::application::query_handlers::get_sequencer_view;
use rescuear_procedure::domain::aggregates::StepSequencer;
use rescuear_procedure::domain::commands::AdvanceStep;
use rescuear_procedure::domain::procedure::Procedure;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::event_bus::EventBus;
use super::handle::{SessionHandle, SessionInbox};
use crate::domain::commands::{CompleteProcedure, PlaceModel};
use crate::domain::events::PresentationEvent;
use crate::domain::inputs::SessionInput;
use crate::domain::state::SessionState;

const EVENT_BUS_CAPACITY: usize = 256;

/// Single writer of [`SessionState`].
pub struct PresentationCoordinator {
    state: SessionState,
    sequencer: StepSequencer,
    narration: NarrationQueue,
    pose: ModelPoseController,
    pending_placement: Option<Pose>,
    started: bool,
    clock: Arc<dyn Clock>,
    inbox: mpsc::WeakUnboundedSender<SessionInput>,
    events: EventBus,
    state_tx: watch::Sender<SessionState>,
}

impl std::fmt::Debug for PresentationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationCoordinator")
            .field("state", &self.state)
            .field("sequencer", &self.sequencer)
            .field("narration", &self.narration)
            .field("pose", &self.pose)
            .field("pending_placement", &self.pending_placement)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

impl PresentationCoordinator {
    /// Creates a coordinator for `procedure`.
    ///
    /// `handle` must be connected to the inbox later passed to
    /// [`run`](Self::run); the coordinator posts timer expiries through it.
    /// It keeps only a weak reference, so the loop still ends once every
    /// other handle is dropped.
    #[must_use]
    pub fn new(
        procedure: Arc<Procedure>,
        narration: NarrationQueue,
        pose: ModelPoseController,
        clock: Arc<dyn Clock>,
        handle: &SessionHandle,
    ) -> Self {
        let session_id = Uuid::new_v4();
        let state = SessionState::new(session_id);
        let (state_tx, _) = watch::channel(state.clone());
        Self {
            state,
            sequencer: StepSequencer::new(session_id, procedure),
            narration,
            pose,
            pending_placement: None,
            started: false,
            clock,
            inbox: handle.downgrade(),
            events: EventBus::new(EVENT_BUS_CAPACITY),
            state_tx,
        }
    }

    /// Session identifier.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.state.session_id
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The step sequencer.
    #[must_use]
    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    /// The narration queue.
    #[must_use]
    pub fn narration(&self) -> &NarrationQueue {
        &self.narration
    }

    /// The model pose controller.
    #[must_use]
    pub fn pose(&self) -> &ModelPoseController {
        &self.pose
    }

    /// Subscribe to presentation events.
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<PresentationEvent> {
        self.events.subscribe()
    }

    /// Subscribe to session state snapshots.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Runs the coordination loop until `Shutdown` or until every handle is
    /// dropped.
    pub async fn run(mut self, mut inbox: SessionInbox) {
        self.start();
        while let Some(input) = inbox.recv().await {
            if self.handle_input(input).is_break() {
                return;
            }
        }
        self.end();
    }

    /// Applies one input.
    pub fn handle_input(&mut self, input: SessionInput) -> ControlFlow<()> {
        match input {
            SessionInput::Advance(command) => self.on_advance(&command),
            SessionInput::Complete(command) => self.on_complete(&command),
            SessionInput::PlaceModel(command) => self.on_place_model(&command),
            SessionInput::TrackingQualityChanged(quality) => self.on_tracking_quality(quality),
            SessionInput::Utterance(event) => self.on_utterance_event(&event),
            SessionInput::TransitionSettled { transition_id } => {
                self.on_transition_settled(transition_id);
            }
            SessionInput::Shutdown => {
                self.end();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Starts the session by narrating the first step. Only the first call
    /// has any effect.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        let view = get_sequencer_view(&self.sequencer);
        info!(
            session_id = %self.state.session_id,
            procedure = %view.procedure_name,
            steps = view.step_count,
            "session started"
        );
        self.publish_state();
        let first = view.instruction_text.clone();
        self.events
            .emit_lossy(PresentationEvent::SessionStarted { sequencer: view });
        self.narrate(first);
    }

    /// Advances to the next step, narrating it and running its pose action.
    ///
    /// Entering `Completed` narrates nothing and does not stand the model
    /// up; that is left to [`on_complete`](Self::on_complete).
    #[instrument(skip(self, command), fields(correlation_id = %command.correlation_id))]
    pub fn on_advance(&mut self, command: &AdvanceStep) {
        debug!(command_type = command.command_type(), "handling command");
        let result = handle_advance_step(command, &mut self.sequencer, &self.clock);
        if !result.advanced {
            return;
        }

        self.state.current_step_index = self.sequencer.current_step_index();
        self.state.procedure_completed = self.sequencer.is_completed();
        self.publish_state();

        for event in &result.events {
            debug!(event_type = event.event_type(), payload = %event.to_payload(), "sequencer event");
        }
        for change in result.step_changes() {
            self.events.emit_lossy(PresentationEvent::StepChanged {
                change: change.clone(),
                correlation_id: command.correlation_id,
            });
        }

        let Some(change) = result.step_changes().last().cloned() else {
            return;
        };
        match (change.index(), change.instruction_text) {
            (Some(index), Some(text)) => {
                info!(step = index, "step changed");
                self.narrate(text);
                let pose_action = self
                    .sequencer
                    .procedure()
                    .step(index)
                    .and_then(|step| step.pose_action.clone());
                if let Some(transition) = pose_action {
                    self.start_transition(transition);
                }
            }
            _ => info!("procedure completed"),
        }
    }

    /// Stands the model up. Allowed at any step.
    #[instrument(skip(self, command), fields(correlation_id = %command.correlation_id))]
    pub fn on_complete(&mut self, command: &CompleteProcedure) {
        debug!(command_type = command.command_type(), "handling command");
        let stand_pose = self.sequencer.procedure().stand_pose().clone();
        self.start_transition(stand_pose);
    }

    /// Places the model, or defers placement until tracking is `Normal`.
    #[instrument(skip(self, command), fields(correlation_id = %command.correlation_id))]
    pub fn on_place_model(&mut self, command: &PlaceModel) {
        debug!(command_type = command.command_type(), "handling command");
        if self.state.model_anchored {
            debug!("model already anchored; placement ignored");
            return;
        }
        if self.pose.model().is_some() && self.state.tracking_quality != TrackingQuality::Normal {
            info!(quality = ?self.state.tracking_quality, "placement deferred until tracking is normal");
            self.pending_placement = Some(command.initial_pose);
            return;
        }
        self.place(command.initial_pose);
    }

    /// Records a tracking quality change and performs any deferred placement
    /// once tracking is `Normal`.
    pub fn on_tracking_quality(&mut self, quality: TrackingQuality) {
        if quality == self.state.tracking_quality {
            return;
        }
        self.state.tracking_quality = quality;
        self.publish_state();
        self.events
            .emit_lossy(PresentationEvent::TrackingQualityChanged { quality });

        if quality == TrackingQuality::Normal {
            if let Some(pose) = self.pending_placement.take() {
                self.place(pose);
            }
        }
    }

    /// Relays a speech engine event to the narration queue.
    pub fn on_utterance_event(&mut self, event: &UtteranceEvent) {
        if let Some(utterance_id) = self.narration.on_utterance_event(event) {
            self.events
                .emit_lossy(PresentationEvent::NarrationFinished { utterance_id });
        }
    }

    /// Completes the running pose transition if `transition_id` matches it.
    pub fn on_transition_settled(&mut self, transition_id: Uuid) {
        if let Some(pose) = self.pose.settle(transition_id) {
            self.events.emit_lossy(PresentationEvent::PoseSettled {
                transition_id,
                pose,
            });
        }
    }

    fn end(&mut self) {
        self.narration.silence();
        self.events.emit_lossy(PresentationEvent::SessionEnded);
        info!(session_id = %self.state.session_id, "session ended");
    }

    fn narrate(&mut self, text: String) {
        if let Some(utterance_id) = self.narration.speak(text.clone()) {
            self.events
                .emit_lossy(PresentationEvent::NarrationRequested { utterance_id, text });
        }
    }

    fn place(&mut self, pose: Pose) {
        match self.pose.place(pose) {
            Ok(pose) => {
                self.state.model_anchored = true;
                self.publish_state();
                self.events.emit_lossy(PresentationEvent::ModelPlaced { pose });
            }
            Err(e) => warn!(error = %e, "model placement failed; continuing without model"),
        }
    }

    fn start_transition(&mut self, transition: PoseTransition) {
        match self.pose.apply_transition(transition) {
            Ok(active) => {
                self.schedule_settle(active.id, active.transition.duration);
                self.events
                    .emit_lossy(PresentationEvent::PoseTransitionStarted { transition: active });
            }
            Err(DomainError::TransitionRejected { in_flight }) => {
                info!(%in_flight, "pose transition rejected: another transition is running");
            }
            Err(e) => warn!(error = %e, "pose transition not started"),
        }
    }

    fn schedule_settle(&self, transition_id: Uuid, after: Duration) {
        let inbox = self.inbox.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    tokio::time::sleep(after).await;
                    if let Some(tx) = inbox.upgrade() {
                        let _ = tx.send(SessionInput::TransitionSettled { transition_id });
                    }
                });
            }
            Err(_) => {
                warn!(%transition_id, "no async runtime; transition settles only when reported");
            }
        }
    }

    fn publish_state(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}
