//! Authoring format for procedure files.
//!
//! Rotations are written as Euler angles in degrees (pitch, yaw, roll) since
//! that is what authors think in; they become quaternions on conversion.

use std::time::Duration;

use rescuear_core::error::DomainError;
use rescuear_core::geometry::{Pose, Quat};
use rescuear_pose::domain::transition::{Easing, PoseTransition};
use serde::{Deserialize, Serialize};

use super::procedure::{Procedure, StepDefinition, default_initial_pose, default_stand_pose};

/// Top-level procedure file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcedureDocument {
    /// Display name.
    pub name: String,
    /// Ordered steps.
    pub steps: Vec<StepDocument>,
    /// Where the model is placed; defaults to the mannequin lying face up.
    #[serde(default)]
    pub initial_pose: Option<PlacementDocument>,
    /// Completion pose; defaults to the mannequin standing up over 1 s.
    #[serde(default)]
    pub stand_pose: Option<TransitionDocument>,
}

/// One step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepDocument {
    /// Instruction text.
    pub instruction: String,
    /// Optional pose change when the step becomes current.
    #[serde(default)]
    pub pose: Option<TransitionDocument>,
}

/// A static placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlacementDocument {
    /// Metres.
    pub position: [f32; 3],
    /// Degrees.
    #[serde(default)]
    pub rotation_degrees: [f32; 3],
    /// Per-axis scale, 1.0 when omitted.
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
}

/// A timed pose change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionDocument {
    /// Metres.
    pub position: [f32; 3],
    /// Degrees.
    #[serde(default)]
    pub rotation_degrees: [f32; 3],
    /// Seconds; must be finite and non-negative.
    pub duration_secs: f64,
    /// Timing curve.
    #[serde(default)]
    pub easing: Easing,
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn finite(field: &str, values: [f32; 3]) -> Result<[f32; 3], DomainError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(values)
    } else {
        Err(DomainError::Validation(format!(
            "{field} must be finite, got {values:?}"
        )))
    }
}

fn quat_from_degrees(degrees: [f32; 3]) -> Result<Quat, DomainError> {
    let [pitch, yaw, roll] = finite("rotation_degrees", degrees)?;
    Ok(Quat::from_euler(
        pitch.to_radians(),
        yaw.to_radians(),
        roll.to_radians(),
    ))
}

impl PlacementDocument {
    /// Converts to a world pose.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if any position, rotation or scale
    /// component is NaN or infinite.
    pub fn to_pose(&self) -> Result<Pose, DomainError> {
        let orientation = quat_from_degrees(self.rotation_degrees)?;
        let position = finite("position", self.position)?;
        let scale = finite("scale", self.scale)?;
        Ok(Pose::new(position.into(), orientation).with_scale(scale.into()))
    }
}

impl TransitionDocument {
    /// Converts to a pose transition.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a negative or non-finite
    /// duration, or a NaN or infinite position or rotation component.
    pub fn to_transition(&self) -> Result<PoseTransition, DomainError> {
        let duration = Duration::try_from_secs_f64(self.duration_secs).map_err(|e| {
            DomainError::Validation(format!(
                "invalid transition duration {}: {e}",
                self.duration_secs
            ))
        })?;
        Ok(PoseTransition::new(
            quat_from_degrees(self.rotation_degrees)?,
            finite("position", self.position)?.into(),
            duration,
        )
        .with_easing(self.easing))
    }
}

impl TryFrom<ProcedureDocument> for Procedure {
    type Error = DomainError;

    fn try_from(doc: ProcedureDocument) -> Result<Self, Self::Error> {
        let steps = doc
            .steps
            .iter()
            .map(|step| {
                Ok(StepDefinition {
                    instruction_text: step.instruction.clone(),
                    pose_action: step.pose.as_ref().map(TransitionDocument::to_transition).transpose()?,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let initial_pose = match &doc.initial_pose {
            Some(placement) => placement.to_pose()?,
            None => default_initial_pose(),
        };
        let stand_pose = match &doc.stand_pose {
            Some(t) => t.to_transition()?,
            None => default_stand_pose(),
        };

        Procedure::new(doc.name, steps, initial_pose, stand_pose)
    }
}
