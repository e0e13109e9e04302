//! Inputs accepted by the coordination loop.

use rescuear_core::sensor::TrackingQuality;
use rescuear_core::speech::UtteranceEvent;
use rescuear_procedure::domain::commands::AdvanceStep;
use uuid::Uuid;

use super::commands::{CompleteProcedure, PlaceModel};

/// Everything that can reach the coordinator, from any execution context.
#[derive(Debug, Clone)]
pub enum SessionInput {
    /// User asked for the next step.
    Advance(AdvanceStep),
    /// User marked the procedure done.
    Complete(CompleteProcedure),
    /// Host asked to place the model.
    PlaceModel(PlaceModel),
    /// Tracking session reported a quality change.
    TrackingQualityChanged(TrackingQuality),
    /// Speech engine reported progress.
    Utterance(UtteranceEvent),
    /// A pose transition's duration elapsed.
    TransitionSettled {
        /// The transition.
        transition_id: Uuid,
    },
    /// Session teardown.
    Shutdown,
}
