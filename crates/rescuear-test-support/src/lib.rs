//! Shared test doubles and utilities for the RescueAR guided procedure engine.

mod clock;
mod sensor;
mod speech;

pub use clock::FixedClock;
pub use sensor::{ScriptedSensorFeed, sensor_sample};
pub use speech::{FailingSpeechBackend, RecordingSpeechBackend};
