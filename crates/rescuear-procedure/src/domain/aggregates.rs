//! Aggregate roots for the Procedure context.

use std::sync::Arc;

use rescuear_core::aggregate::AggregateRoot;
use rescuear_core::clock::Clock;
use rescuear_core::event::EventMetadata;
use uuid::Uuid;

use super::events::{
    STEP_CHANGED_EVENT_TYPE, SequencerEvent, SequencerEventKind, SequencerState, StepChanged,
};
use super::procedure::{Procedure, ProcedureStep};

/// Forward-only state machine over a procedure's steps.
///
/// Starts on step 0. There is intentionally no way back.
#[derive(Debug)]
pub struct StepSequencer {
    /// Aggregate identifier.
    pub id: Uuid,
    version: i64,
    procedure: Arc<Procedure>,
    state: SequencerState,
    /// Events not yet taken by the coordinator.
    pending_events: Vec<SequencerEvent>,
}

impl StepSequencer {
    /// Creates a sequencer on the first step of `procedure`.
    #[must_use]
    pub fn new(id: Uuid, procedure: Arc<Procedure>) -> Self {
        Self {
            id,
            version: 0,
            procedure,
            state: SequencerState::Step(0),
            pending_events: Vec::new(),
        }
    }

    /// The procedure being sequenced.
    #[must_use]
    pub fn procedure(&self) -> &Arc<Procedure> {
        &self.procedure
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Index of the active step. Stays on the last step once completed, so
    /// it is always a valid index.
    #[must_use]
    pub fn current_step_index(&self) -> usize {
        match self.state {
            SequencerState::Step(index) => index,
            SequencerState::Completed => self.procedure.len() - 1,
        }
    }

    /// The active step (the last one once completed).
    #[must_use]
    pub fn current_step(&self) -> &ProcedureStep {
        &self.procedure.steps()[self.current_step_index()]
    }

    /// Returns true once past the last step.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    /// Moves one step forward, producing a `StepChanged` event.
    ///
    /// From the last step this enters `Completed`. Once completed, further
    /// calls change nothing and return `false`.
    pub fn advance(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> bool {
        let next = match self.state {
            SequencerState::Step(index) if index + 1 < self.procedure.len() => {
                SequencerState::Step(index + 1)
            }
            SequencerState::Step(_) => SequencerState::Completed,
            SequencerState::Completed => return false,
        };
        let instruction_text = next
            .step_index()
            .and_then(|index| self.procedure.step(index))
            .map(|step| step.instruction_text.clone());

        self.state = next;
        self.version += 1;
        self.pending_events.push(SequencerEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: STEP_CHANGED_EVENT_TYPE.to_owned(),
                aggregate_id: self.id,
                sequence_number: self.version,
                correlation_id,
                occurred_at: clock.now(),
            },
            kind: SequencerEventKind::StepChanged(StepChanged {
                state: next,
                instruction_text,
            }),
        });
        true
    }
}

impl AggregateRoot for StepSequencer {
    type Event = SequencerEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn pending_events(&self) -> &[Self::Event] {
        &self.pending_events
    }

    fn take_pending_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.pending_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescuear_core::event::DomainEvent;
    use rescuear_test_support::FixedClock;

    const SCENARIO: [&str; 3] = [
        "Check responsiveness.",
        "Call for help.",
        "Begin compressions.",
    ];

    fn sequencer() -> StepSequencer {
        let procedure = Procedure::from_instructions("Scenario", SCENARIO).unwrap();
        StepSequencer::new(Uuid::new_v4(), Arc::new(procedure))
    }

    fn clock() -> FixedClock {
        FixedClock::morning()
    }

    #[test]
    fn test_new_sequencer_starts_on_first_step() {
        let sequencer = sequencer();

        assert_eq!(sequencer.state(), SequencerState::Step(0));
        assert_eq!(sequencer.current_step().instruction_text, SCENARIO[0]);
        assert!(sequencer.pending_events().is_empty());
    }

    #[test]
    fn test_advance_lands_on_each_configured_step() {
        let clock = clock();
        for i in 0..SCENARIO.len() - 1 {
            // Arrange
            let mut sequencer = sequencer();

            // Act
            for _ in 0..=i {
                assert!(sequencer.advance(Uuid::new_v4(), &clock));
            }

            // Assert
            assert_eq!(sequencer.state(), SequencerState::Step(i + 1));
            assert_eq!(sequencer.current_step().instruction_text, SCENARIO[i + 1]);
        }
    }

    #[test]
    fn test_advance_produces_step_changed_event() {
        // Arrange
        let correlation_id = Uuid::new_v4();
        let clock = clock();
        let mut sequencer = sequencer();

        // Act
        sequencer.advance(correlation_id, &clock);

        // Assert
        let events = sequencer.pending_events();
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert_eq!(event.event_type(), "procedure.step_changed");

        let meta = event.metadata();
        assert_eq!(meta.aggregate_id, sequencer.id);
        assert_eq!(meta.sequence_number, 1);
        assert_eq!(meta.correlation_id, correlation_id);
        assert_eq!(meta.occurred_at, clock.0);

        match &event.kind {
            SequencerEventKind::StepChanged(payload) => {
                assert_eq!(payload.index(), Some(1));
                assert_eq!(payload.instruction_text.as_deref(), Some("Call for help."));
            }
        }
    }

    #[test]
    fn test_advance_n_times_completes_and_then_is_idempotent() {
        // Arrange
        let clock = clock();
        let mut sequencer = sequencer();

        // Act
        for _ in 0..SCENARIO.len() {
            assert!(sequencer.advance(Uuid::new_v4(), &clock));
        }
        let extra = sequencer.advance(Uuid::new_v4(), &clock);

        // Assert
        assert!(!extra);
        assert!(sequencer.is_completed());
        assert_eq!(sequencer.version(), 3);
        assert_eq!(sequencer.pending_events().len(), 3);
        assert_eq!(sequencer.current_step_index(), SCENARIO.len() - 1);

        let SequencerEventKind::StepChanged(last) = &sequencer.pending_events()[2].kind;
        assert_eq!(last.state, SequencerState::Completed);
        assert_eq!(last.instruction_text, None);
    }

    #[test]
    fn test_single_step_procedure_completes_on_first_advance() {
        let procedure = Procedure::from_instructions("One", ["Call for help."]).unwrap();
        let mut sequencer = StepSequencer::new(Uuid::new_v4(), Arc::new(procedure));

        assert!(sequencer.advance(Uuid::new_v4(), &clock()));

        assert!(sequencer.is_completed());
        assert_eq!(sequencer.current_step_index(), 0);
    }

    #[test]
    fn test_take_pending_events_drains_and_keeps_state() {
        let mut sequencer = sequencer();
        sequencer.advance(Uuid::new_v4(), &clock());

        let taken = sequencer.take_pending_events();

        assert_eq!(taken.len(), 1);
        assert!(sequencer.pending_events().is_empty());
        assert_eq!(sequencer.state(), SequencerState::Step(1));
        assert_eq!(sequencer.version(), 1);
    }
}
