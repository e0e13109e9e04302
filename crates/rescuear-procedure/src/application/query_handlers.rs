//! Query handlers for the Procedure context.

use rescuear_core::aggregate::AggregateRoot;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::StepSequencer;
use crate::domain::events::SequencerState;

/// Read-only view of the sequencer, published when a session starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequencerView {
    /// The sequencer identifier.
    pub sequencer_id: Uuid,
    /// Procedure display name.
    pub procedure_name: String,
    /// Current state, flattened into `state` and `index`.
    #[serde(flatten)]
    pub state: SequencerState,
    /// Active step; the last one once completed.
    pub current_step_index: usize,
    /// Text of the active step.
    pub instruction_text: String,
    /// Total number of steps.
    pub step_count: usize,
    /// Current version (event count).
    pub version: i64,
}

/// Builds the read-only view of `sequencer`.
#[must_use]
pub fn get_sequencer_view(sequencer: &StepSequencer) -> SequencerView {
    SequencerView {
        sequencer_id: sequencer.aggregate_id(),
        procedure_name: sequencer.procedure().name().to_owned(),
        state: sequencer.state(),
        current_step_index: sequencer.current_step_index(),
        instruction_text: sequencer.current_step().instruction_text.clone(),
        step_count: sequencer.procedure().len(),
        version: sequencer.version(),
    }
}
