//! Commands for the Session & Presentation context.

use rescuear_core::command::Command;
use rescuear_core::geometry::Pose;
use uuid::Uuid;

/// Command to mark the procedure done and stand the model up.
#[derive(Debug, Clone)]
pub struct CompleteProcedure {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for CompleteProcedure {
    fn command_type(&self) -> &'static str {
        "session.complete_procedure"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to place the model in the world.
#[derive(Debug, Clone)]
pub struct PlaceModel {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Where to place it.
    pub initial_pose: Pose,
}

impl Command for PlaceModel {
    fn command_type(&self) -> &'static str {
        "session.place_model"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
