//! Domain events for the Procedure context.

use rescuear_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

/// Where the sequencer currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum SequencerState {
    /// On the step with this zero-based index.
    Step(usize),
    /// Past the last step.
    Completed,
}

impl SequencerState {
    /// The step index, or `None` once completed.
    #[must_use]
    pub fn step_index(self) -> Option<usize> {
        match self {
            Self::Step(index) => Some(index),
            Self::Completed => None,
        }
    }

    /// Returns true for the terminal state.
    #[must_use]
    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

/// Emitted on every successful sequencer transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepChanged {
    /// The state entered. Flattened so `state` and `index` sit beside
    /// `instruction_text`.
    #[serde(flatten)]
    pub state: SequencerState,
    /// Instruction of the step entered; `None` when entering `Completed`.
    pub instruction_text: Option<String>,
}

impl StepChanged {
    /// The step index entered, or `None` when entering `Completed`.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.state.step_index()
    }
}

/// Event type identifier for [`StepChanged`].
pub const STEP_CHANGED_EVENT_TYPE: &str = "procedure.step_changed";

/// Event payload variants for the Procedure context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequencerEventKind {
    /// The sequencer moved forward.
    StepChanged(StepChanged),
}

/// Domain event envelope for the Procedure context.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencerEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: SequencerEventKind,
}

impl DomainEvent for SequencerEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            SequencerEventKind::StepChanged(_) => STEP_CHANGED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("SequencerEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
