//! RescueAR — Narration context.
//!
//! Serializes spoken output: at most one utterance is in flight, and a new
//! request hard-stops whatever is playing. Narration is best-effort; engine
//! failures are logged and never reach the caller.

pub mod application;
pub mod domain;
