//! Commands for the Procedure context.

use rescuear_core::command::Command;
use uuid::Uuid;

/// Command to move the sequencer to the next step.
#[derive(Debug, Clone)]
pub struct AdvanceStep {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for AdvanceStep {
    fn command_type(&self) -> &'static str {
        "procedure.advance_step"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
