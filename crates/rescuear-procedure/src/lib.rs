//! RescueAR — Procedure context.
//!
//! Responsible for loading the ordered list of procedure steps and for the
//! step sequencer, a forward-only state machine over that list.

pub mod application;
pub mod domain;
