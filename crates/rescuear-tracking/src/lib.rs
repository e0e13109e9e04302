//! RescueAR — World Tracking context.
//!
//! Responsible for running world tracking over the external sensor feed,
//! filtering plane detections to what the session requested, publishing
//! frame snapshots to readers and reporting tracking-quality changes.

pub mod application;
pub mod domain;
