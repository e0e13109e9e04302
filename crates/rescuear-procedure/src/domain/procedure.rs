//! The procedure: an immutable, ordered list of steps.

use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use rescuear_core::error::DomainError;
use rescuear_core::geometry::{Pose, Quat, Vec3};
use rescuear_pose::domain::transition::PoseTransition;
use serde::Serialize;

/// One instruction of a procedure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureStep {
    /// Zero-based position in the procedure.
    pub index: usize,
    /// Text shown and spoken for the step.
    pub instruction_text: String,
    /// Pose change performed when the step becomes current.
    pub pose_action: Option<PoseTransition>,
}

/// A step before it has been given its position.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDefinition {
    /// Text shown and spoken for the step.
    pub instruction_text: String,
    /// Pose change performed when the step becomes current.
    pub pose_action: Option<PoseTransition>,
}

impl StepDefinition {
    /// A step with no pose action.
    #[must_use]
    pub fn instruction(text: impl Into<String>) -> Self {
        Self {
            instruction_text: text.into(),
            pose_action: None,
        }
    }
}

/// A loaded procedure. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Procedure {
    name: String,
    steps: Vec<ProcedureStep>,
    initial_pose: Pose,
    stand_pose: PoseTransition,
}

impl Procedure {
    /// Builds a procedure, numbering the steps in order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if there are no steps, a step has
    /// blank instruction text, or a pose is unusable.
    pub fn new(
        name: impl Into<String>,
        steps: Vec<StepDefinition>,
        initial_pose: Pose,
        stand_pose: PoseTransition,
    ) -> Result<Self, DomainError> {
        if steps.is_empty() {
            return Err(DomainError::Validation(
                "a procedure needs at least one step".into(),
            ));
        }
        if !initial_pose.position.is_finite() || !initial_pose.scale.is_finite() {
            return Err(DomainError::Validation(
                "initial pose must be finite".into(),
            ));
        }
        stand_pose.validate()?;

        let steps = steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| {
                if step.instruction_text.trim().is_empty() {
                    return Err(DomainError::Validation(format!(
                        "step {index} has no instruction text"
                    )));
                }
                if let Some(pose) = &step.pose_action {
                    pose.validate()?;
                }
                Ok(ProcedureStep {
                    index,
                    instruction_text: step.instruction_text,
                    pose_action: step.pose_action,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.into(),
            steps,
            initial_pose,
            stand_pose,
        })
    }

    /// Builds a procedure from plain instructions with the default mannequin
    /// placement and stand-up pose.
    ///
    /// # Errors
    ///
    /// Same as [`Procedure::new`].
    pub fn from_instructions<I, S>(name: impl Into<String>, instructions: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            instructions
                .into_iter()
                .map(StepDefinition::instruction)
                .collect(),
            default_initial_pose(),
            default_stand_pose(),
        )
    }

    /// The built-in adult CPR walkthrough.
    #[must_use]
    pub fn cpr_default() -> Self {
        let steps = CPR_STEPS
            .iter()
            .enumerate()
            .map(|(index, text)| ProcedureStep {
                index,
                instruction_text: (*text).to_owned(),
                pose_action: None,
            })
            .collect();
        Self {
            name: "Adult CPR".to_owned(),
            steps,
            initial_pose: default_initial_pose(),
            stand_pose: default_stand_pose(),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All steps in order.
    #[must_use]
    pub fn steps(&self) -> &[ProcedureStep] {
        &self.steps
    }

    /// Number of steps; always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`, if in range.
    #[must_use]
    pub fn step(&self, index: usize) -> Option<&ProcedureStep> {
        self.steps.get(index)
    }

    /// The first step.
    #[must_use]
    pub fn first_step(&self) -> &ProcedureStep {
        &self.steps[0]
    }

    /// Where the mannequin is placed when tracking allows.
    #[must_use]
    pub fn initial_pose(&self) -> Pose {
        self.initial_pose
    }

    /// Transition performed when the procedure is marked complete.
    #[must_use]
    pub fn stand_pose(&self) -> &PoseTransition {
        &self.stand_pose
    }
}

const CPR_STEPS: [&str; 5] = [
    "Check if the person is responsive.",
    "Call emergency services immediately.",
    "Begin chest compressions at a rate of 100 to 120 per minute.",
    "After 30 compressions, give 2 rescue breaths.",
    "Continue the cycle until help arrives.",
];

/// Mannequin lying face up, one metre in front of the camera.
#[must_use]
pub fn default_initial_pose() -> Pose {
    Pose::new(
        Vec3::new(0.0, -0.1, -1.0),
        Quat::from_euler(-FRAC_PI_2, 0.0, 0.0),
    )
    .with_scale(Vec3::new(0.1, 0.2, 0.1))
}

/// Mannequin rotating upright over one second.
#[must_use]
pub fn default_stand_pose() -> PoseTransition {
    PoseTransition::new(
        Quat::IDENTITY,
        Vec3::new(0.0, -0.1, -1.0),
        Duration::from_secs(1),
    )
}
