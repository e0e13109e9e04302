//! Console stand-in for the UI and renderer.
//!
//! Consumes presentation events and logs what a real front end would show:
//! the instruction label, the model placement and each pose animation.
//! Running transitions are sampled once per frame so the drawn pose moves
//! smoothly between rest poses.

use std::time::Duration;

use rescuear_core::geometry::Pose;
use rescuear_pose::domain::transition::ActiveTransition;
use rescuear_session::domain::events::PresentationEvent;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

/// Time between animation frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Text the instruction label would show after `event`, if it changes.
#[must_use]
pub fn instruction_label(event: &PresentationEvent) -> Option<String> {
    match event {
        PresentationEvent::SessionStarted { sequencer } => {
            Some(sequencer.instruction_text.clone())
        }
        PresentationEvent::StepChanged { change, .. } => Some(
            change
                .instruction_text
                .clone()
                .unwrap_or_else(|| "Procedure complete.".to_owned()),
        ),
        _ => None,
    }
}

struct Animation {
    transition: ActiveTransition,
    started: Instant,
}

/// Follows presentation events and drives the drawn model pose.
pub struct Renderer {
    model: watch::Sender<Option<Pose>>,
    animation: Option<Animation>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("model", &*self.model.borrow())
            .field("animating", &self.animation.as_ref().map(|a| a.transition.id))
            .finish()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Creates a renderer with no model on screen.
    #[must_use]
    pub fn new() -> Self {
        let (model, _) = watch::channel(None);
        Self {
            model,
            animation: None,
        }
    }

    /// The pose currently drawn; `None` until the model is placed.
    #[must_use]
    pub fn watch_model(&self) -> watch::Receiver<Option<Pose>> {
        self.model.subscribe()
    }

    /// Renders events until the bus closes, drawing a frame every
    /// [`FRAME_INTERVAL`] while a transition runs.
    pub async fn run(mut self, mut events: broadcast::Receiver<PresentationEvent>) {
        let mut frames = tokio::time::interval(FRAME_INTERVAL);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                received = events.recv() => match received {
                    Ok(event) => self.render(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "renderer fell behind; events dropped");
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = frames.tick(), if self.animation.is_some() => self.draw_frame(),
            }
        }
        debug!("renderer stopped");
    }

    fn render(&mut self, event: &PresentationEvent) {
        if let Some(label) = instruction_label(event) {
            info!(label = %label, "instruction");
        }
        match event {
            PresentationEvent::ModelPlaced { pose } => {
                info!(position = ?pose.position, scale = ?pose.scale, "model placed");
                self.animation = None;
                self.model.send_replace(Some(*pose));
            }
            PresentationEvent::PoseTransitionStarted { transition } => {
                info!(
                    transition_id = %transition.id,
                    duration_ms = transition.transition.duration.as_millis(),
                    easing = ?transition.transition.easing,
                    target_position = ?transition.target().position,
                    "animating model"
                );
                self.model.send_replace(Some(transition.from));
                self.animation = Some(Animation {
                    transition: transition.clone(),
                    started: Instant::now(),
                });
            }
            PresentationEvent::PoseSettled {
                transition_id,
                pose,
            } => {
                debug!(%transition_id, "model settled");
                self.animation = None;
                self.model.send_replace(Some(*pose));
            }
            PresentationEvent::SessionEnded => info!("session ended"),
            _ => {}
        }
        match serde_json::to_string(event) {
            Ok(json) => debug!(event = %json, "presentation event"),
            Err(e) => warn!(error = %e, "cannot encode presentation event"),
        }
    }

    fn draw_frame(&mut self) {
        let Some(animation) = &self.animation else {
            return;
        };
        let elapsed = animation.started.elapsed();
        let pose = animation.transition.sample_at(elapsed);
        trace!(
            transition_id = %animation.transition.id,
            elapsed_ms = elapsed.as_millis(),
            position = ?pose.position,
            "frame"
        );
        self.model.send_replace(Some(pose));
        // Past the end the target is held until PoseSettled arrives.
        if elapsed >= animation.transition.transition.duration {
            self.animation = None;
        }
    }
}

/// Renders presentation events on a fresh [`Renderer`] until the bus closes.
pub async fn run_renderer(events: broadcast::Receiver<PresentationEvent>) {
    Renderer::new().run(events).await;
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use rescuear_core::geometry::{Quat, Vec3};
    use rescuear_pose::domain::transition::PoseTransition;
    use rescuear_procedure::domain::events::{SequencerState, StepChanged};
    use uuid::Uuid;

    use super::*;

    fn step_changed(state: SequencerState, text: Option<&str>) -> PresentationEvent {
        PresentationEvent::StepChanged {
            change: StepChanged {
                state,
                instruction_text: text.map(str::to_owned),
            },
            correlation_id: Uuid::new_v4(),
        }
    }

    fn stand_up(duration: Duration) -> ActiveTransition {
        ActiveTransition {
            id: Uuid::new_v4(),
            from: Pose::new(
                Vec3::new(0.0, -0.1, -1.0),
                Quat::from_euler(-FRAC_PI_2, 0.0, 0.0),
            ),
            transition: PoseTransition::new(Quat::IDENTITY, Vec3::new(0.0, 0.0, -1.0), duration),
        }
    }

    #[test]
    fn test_label_follows_step_changes() {
        assert_eq!(
            instruction_label(&step_changed(SequencerState::Step(1), Some("Call for help."))),
            Some("Call for help.".to_owned())
        );
        assert_eq!(
            instruction_label(&step_changed(SequencerState::Completed, None)),
            Some("Procedure complete.".to_owned())
        );
        assert_eq!(instruction_label(&PresentationEvent::SessionEnded), None);
    }

    #[tokio::test]
    async fn test_renderer_stops_when_bus_closes() {
        // Arrange
        let (tx, rx) = broadcast::channel(4);
        let renderer = tokio::spawn(run_renderer(rx));
        tx.send(step_changed(SequencerState::Step(1), Some("Call for help.")))
            .unwrap();

        // Act
        drop(tx);

        // Assert
        renderer.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_renderer_interpolates_transition_until_settled() {
        // Arrange
        let (tx, rx) = broadcast::channel(8);
        let renderer = Renderer::new();
        let model = renderer.watch_model();
        let task = tokio::spawn(renderer.run(rx));
        let transition = stand_up(Duration::from_secs(1));
        let target = transition.target();

        // Act
        tx.send(PresentationEvent::PoseTransitionStarted {
            transition: transition.clone(),
        })
        .unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        let midway = model.borrow().unwrap();
        tx.send(PresentationEvent::PoseSettled {
            transition_id: transition.id,
            pose: target,
        })
        .unwrap();
        tokio::time::sleep(FRAME_INTERVAL * 2).await;

        // Assert
        assert!(midway.orientation.angle_to(transition.from.orientation) > 0.1);
        assert!(midway.orientation.angle_to(target.orientation) > 0.1);
        assert!(midway.position.y > -0.1 && midway.position.y < 0.0);
        assert_eq!(*model.borrow(), Some(target));

        drop(tx);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_renderer_holds_target_once_duration_elapses() {
        // Arrange
        let (tx, rx) = broadcast::channel(8);
        let renderer = Renderer::new();
        let model = renderer.watch_model();
        let task = tokio::spawn(renderer.run(rx));
        let transition = stand_up(Duration::from_millis(200));

        // Act
        tx.send(PresentationEvent::PoseTransitionStarted {
            transition: transition.clone(),
        })
        .unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;

        // Assert
        let drawn = model.borrow().unwrap();
        assert!(drawn.orientation.angle_to(Quat::IDENTITY) < 1e-4);
        assert!(drawn.position.distance(transition.target().position) < 1e-5);

        drop(tx);
        task.await.unwrap();
    }
}
