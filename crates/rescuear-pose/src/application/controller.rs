//! Model pose controller.
//!
//! The controller is a plain state holder: it never sleeps or spawns. Whoever
//! owns it (the presentation coordinator) is responsible for calling
//! [`ModelPoseController::settle`] once a started transition's duration has
//! elapsed.

use rescuear_core::error::DomainError;
use rescuear_core::geometry::Pose;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::model::ModelHandle;
use crate::domain::transition::{ActiveTransition, PoseTransition};

/// Owns the figure's placement and its in-flight transition, if any.
#[derive(Debug)]
pub struct ModelPoseController {
    model: Option<ModelHandle>,
    settled: Option<Pose>,
    in_flight: Option<ActiveTransition>,
}

impl ModelPoseController {
    /// Creates a controller for `model`. `None` means the asset failed to
    /// load; every pose operation then fails without side effects.
    #[must_use]
    pub fn new(model: Option<ModelHandle>) -> Self {
        Self {
            model,
            settled: None,
            in_flight: None,
        }
    }

    /// The loaded model, if any.
    #[must_use]
    pub fn model(&self) -> Option<&ModelHandle> {
        self.model.as_ref()
    }

    /// Returns true once the model has been placed in the world.
    #[must_use]
    pub fn is_anchored(&self) -> bool {
        self.settled.is_some()
    }

    /// Returns true while a transition is running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The transition currently running, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<&ActiveTransition> {
        self.in_flight.as_ref()
    }

    /// The last settled pose. Never reflects a transition that is still
    /// running.
    #[must_use]
    pub fn current_pose(&self) -> Option<Pose> {
        self.settled
    }

    /// Places the model in the world and anchors it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ModelUnavailable` if no model asset was loaded
    /// and `DomainError::Validation` if the model is already anchored.
    pub fn place(&mut self, initial_pose: Pose) -> Result<Pose, DomainError> {
        let Some(model) = &self.model else {
            warn!("cannot place model: no model asset loaded");
            return Err(DomainError::ModelUnavailable(
                "no model asset loaded".into(),
            ));
        };
        if self.settled.is_some() {
            return Err(DomainError::Validation("model is already anchored".into()));
        }

        info!(asset = %model.name, position = ?initial_pose.position, "model placed");
        self.settled = Some(initial_pose);
        Ok(initial_pose)
    }

    /// Starts `transition` from the current settled pose.
    ///
    /// A running transition is never interrupted: a second request while one
    /// is in flight is rejected and the running one is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ModelNotAnchored` before placement,
    /// `DomainError::TransitionRejected` while another transition runs, and
    /// `DomainError::Validation` for an unusable target.
    pub fn apply_transition(
        &mut self,
        transition: PoseTransition,
    ) -> Result<ActiveTransition, DomainError> {
        let Some(from) = self.settled else {
            return Err(DomainError::ModelNotAnchored);
        };
        if let Some(running) = &self.in_flight {
            debug!(in_flight = %running.id, "pose transition rejected: busy");
            return Err(DomainError::TransitionRejected {
                in_flight: running.id,
            });
        }
        transition.validate()?;

        let active = ActiveTransition {
            id: Uuid::new_v4(),
            from,
            transition,
        };
        info!(
            transition_id = %active.id,
            duration_ms = u64::try_from(active.transition.duration.as_millis()).unwrap_or(u64::MAX),
            easing = ?active.transition.easing,
            "pose transition started"
        );
        self.in_flight = Some(active.clone());
        Ok(active)
    }

    /// Completes the in-flight transition identified by `transition_id` and
    /// returns the new settled pose. Stale or unknown ids are ignored.
    pub fn settle(&mut self, transition_id: Uuid) -> Option<Pose> {
        match &self.in_flight {
            Some(active) if active.id == transition_id => {
                let target = active.target();
                self.settled = Some(target);
                self.in_flight = None;
                info!(%transition_id, "pose transition settled");
                Some(target)
            }
            _ => {
                debug!(%transition_id, "ignoring settle for a transition that is not running");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;
    use std::time::Duration;

    use rescuear_core::geometry::{Quat, Vec3};

    use super::*;

    fn lying_down() -> Pose {
        Pose::new(
            Vec3::new(0.0, -0.1, -1.0),
            Quat::from_euler(-FRAC_PI_2, 0.0, 0.0),
        )
        .with_scale(Vec3::new(0.1, 0.2, 0.1))
    }

    fn stand_pose() -> PoseTransition {
        PoseTransition::new(
            Quat::IDENTITY,
            Vec3::new(0.0, -0.1, -1.0),
            Duration::from_secs(1),
        )
    }

    fn anchored_controller() -> ModelPoseController {
        let mut controller = ModelPoseController::new(Some(ModelHandle::new("Male.usdz")));
        controller.place(lying_down()).unwrap();
        controller
    }

    #[test]
    fn test_place_anchors_model() {
        // Arrange
        let mut controller = ModelPoseController::new(Some(ModelHandle::new("Male.usdz")));

        // Act
        let placed = controller.place(lying_down()).unwrap();

        // Assert
        assert!(controller.is_anchored());
        assert_eq!(controller.current_pose(), Some(placed));
    }

    #[test]
    fn test_place_without_model_is_a_noop() {
        // Arrange
        let mut controller = ModelPoseController::new(None);

        // Act
        let result = controller.place(lying_down());

        // Assert
        assert!(matches!(result, Err(DomainError::ModelUnavailable(_))));
        assert!(!controller.is_anchored());
        assert_eq!(controller.current_pose(), None);
    }

    #[test]
    fn test_place_twice_is_rejected() {
        let mut controller = anchored_controller();

        let result = controller.place(Pose::default());

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(controller.current_pose(), Some(lying_down()));
    }

    #[test]
    fn test_apply_transition_requires_anchor() {
        let mut controller = ModelPoseController::new(Some(ModelHandle::new("Male.usdz")));

        let result = controller.apply_transition(stand_pose());

        assert!(matches!(result, Err(DomainError::ModelNotAnchored)));
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_second_transition_while_running_is_rejected() {
        // Arrange
        let mut controller = anchored_controller();
        let first = controller.apply_transition(stand_pose()).unwrap();

        // Act
        let second = controller.apply_transition(
            stand_pose().with_easing(crate::domain::transition::Easing::EaseOut),
        );

        // Assert
        match second {
            Err(DomainError::TransitionRejected { in_flight }) => assert_eq!(in_flight, first.id),
            other => panic!("expected TransitionRejected, got {other:?}"),
        }
        assert_eq!(controller.in_flight(), Some(&first));
    }

    #[test]
    fn test_current_pose_stays_settled_until_transition_completes() {
        // Arrange
        let mut controller = anchored_controller();
        let active = controller.apply_transition(stand_pose()).unwrap();

        // Act / Assert
        assert_eq!(controller.current_pose(), Some(lying_down()));

        let settled = controller.settle(active.id).unwrap();
        assert_eq!(controller.current_pose(), Some(settled));
        assert_eq!(settled.orientation, Quat::IDENTITY);
        assert_eq!(settled.scale, Vec3::new(0.1, 0.2, 0.1));
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_settle_ignores_unknown_transition() {
        let mut controller = anchored_controller();
        let active = controller.apply_transition(stand_pose()).unwrap();

        assert_eq!(controller.settle(Uuid::new_v4()), None);
        assert_eq!(controller.in_flight().map(|a| a.id), Some(active.id));
    }

    #[test]
    fn test_transition_accepted_again_after_settling() {
        let mut controller = anchored_controller();
        let first = controller.apply_transition(stand_pose()).unwrap();
        controller.settle(first.id);

        let second = controller.apply_transition(stand_pose()).unwrap();

        assert_ne!(second.id, first.id);
        assert_eq!(second.from.orientation, Quat::IDENTITY);
    }
}
