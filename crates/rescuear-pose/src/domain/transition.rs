//! Pose transitions.

use std::time::Duration;

use rescuear_core::error::DomainError;
use rescuear_core::geometry::{Pose, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timing curve applied to transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Starts slow.
    EaseIn,
    /// Ends slow.
    EaseOut,
    /// Starts and ends slow.
    EaseInOut,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress. Input is clamped.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// A timed move of the model to a target placement. Scale is untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseTransition {
    /// Orientation at the end of the transition.
    pub target_orientation: Quat,
    /// Position at the end of the transition.
    pub target_position: Vec3,
    /// How long the transition runs.
    pub duration: Duration,
    /// Timing curve.
    pub easing: Easing,
}

impl PoseTransition {
    /// Creates a linear transition.
    #[must_use]
    pub fn new(target_orientation: Quat, target_position: Vec3, duration: Duration) -> Self {
        Self {
            target_orientation,
            target_position,
            duration,
            easing: Easing::Linear,
        }
    }

    /// Returns the transition with a different easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Checks that the target is a usable rest pose.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the target position is not finite
    /// or the target orientation is degenerate.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.target_position.is_finite() {
            return Err(DomainError::Validation(
                "pose transition target position must be finite".into(),
            ));
        }
        let q = self.target_orientation;
        let norm = q.dot(q);
        if !norm.is_finite() || norm <= f32::EPSILON {
            return Err(DomainError::Validation(
                "pose transition target orientation must be a non-zero quaternion".into(),
            ));
        }
        Ok(())
    }

    /// The settled pose this transition produces when started from `from`.
    #[must_use]
    pub fn target_pose(&self, from: &Pose) -> Pose {
        Pose {
            position: self.target_position,
            orientation: self.target_orientation.normalize(),
            scale: from.scale,
        }
    }
}

/// A transition that has been started on the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveTransition {
    /// Identifier the coordinator uses to settle the transition.
    pub id: Uuid,
    /// Settled pose the transition started from.
    pub from: Pose,
    /// The requested transition.
    pub transition: PoseTransition,
}

impl ActiveTransition {
    /// The pose the model settles in when the transition completes.
    #[must_use]
    pub fn target(&self) -> Pose {
        self.transition.target_pose(&self.from)
    }

    /// Interpolated pose at linear `progress` in `[0, 1]`, for animation.
    #[must_use]
    pub fn sample(&self, progress: f32) -> Pose {
        let t = self.transition.easing.apply(progress);
        let target = self.target();
        Pose {
            position: self.from.position.lerp(target.position, t),
            orientation: self.from.orientation.slerp(target.orientation, t),
            scale: self.from.scale,
        }
    }

    /// Interpolated pose after `elapsed` time.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample_at(&self, elapsed: Duration) -> Pose {
        if self.transition.duration.is_zero() {
            return self.target();
        }
        let progress = elapsed.as_secs_f64() / self.transition.duration.as_secs_f64();
        self.sample(progress as f32)
    }
}
