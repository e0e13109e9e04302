//! Command handlers for the Procedure context.
//!
//! Handlers run the command against the sequencer and hand back the events
//! it produced, leaving the sequencer with nothing pending.

use rescuear_core::aggregate::AggregateRoot;
use rescuear_core::clock::Clock;
use rescuear_core::command::Command;
use tracing::debug;

use crate::domain::aggregates::StepSequencer;
use crate::domain::commands::AdvanceStep;
use crate::domain::events::{SequencerEvent, SequencerEventKind, StepChanged};

/// Result of a handled sequencer command.
#[derive(Debug)]
pub struct SequencerCommandResult {
    /// Whether the sequencer moved.
    pub advanced: bool,
    /// The events produced, in order.
    pub events: Vec<SequencerEvent>,
}

impl SequencerCommandResult {
    /// The `StepChanged` payloads among the produced events.
    pub fn step_changes(&self) -> impl Iterator<Item = &StepChanged> {
        self.events.iter().map(|event| match &event.kind {
            SequencerEventKind::StepChanged(payload) => payload,
        })
    }
}

/// Handles the `AdvanceStep` command.
///
/// Advancing a completed sequencer is not an error; the result simply
/// carries no events.
pub fn handle_advance_step(
    command: &AdvanceStep,
    sequencer: &mut StepSequencer,
    clock: &dyn Clock,
) -> SequencerCommandResult {
    let advanced = sequencer.advance(command.correlation_id(), clock);
    if !advanced {
        debug!(
            correlation_id = %command.correlation_id(),
            "advance ignored: procedure already completed"
        );
    }
    SequencerCommandResult {
        advanced,
        events: sequencer.take_pending_events(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rescuear_test_support::FixedClock;
    use uuid::Uuid;

    use super::*;
    use crate::domain::events::SequencerState;
    use crate::domain::procedure::Procedure;

    fn command() -> AdvanceStep {
        AdvanceStep {
            correlation_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_handle_advance_step_returns_and_drains_events() {
        // Arrange
        let clock = FixedClock::morning();
        let procedure = Procedure::from_instructions("Two", ["First.", "Second."]).unwrap();
        let mut sequencer = StepSequencer::new(Uuid::new_v4(), Arc::new(procedure));
        let command = command();

        // Act
        let result = handle_advance_step(&command, &mut sequencer, &clock);

        // Assert
        assert!(result.advanced);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].metadata.correlation_id, command.correlation_id);
        let changes: Vec<_> = result.step_changes().cloned().collect();
        assert_eq!(
            changes,
            vec![StepChanged {
                state: SequencerState::Step(1),
                instruction_text: Some("Second.".into()),
            }]
        );
        assert!(sequencer.pending_events().is_empty());
    }

    #[test]
    fn test_handle_advance_step_after_completion_yields_nothing() {
        // Arrange
        let clock = FixedClock::morning();
        let procedure = Procedure::from_instructions("One", ["Only."]).unwrap();
        let mut sequencer = StepSequencer::new(Uuid::new_v4(), Arc::new(procedure));
        handle_advance_step(&command(), &mut sequencer, &clock);

        // Act
        let result = handle_advance_step(&command(), &mut sequencer, &clock);

        // Assert
        assert!(!result.advanced);
        assert!(result.events.is_empty());
        assert_eq!(sequencer.version(), 1);
    }
}
