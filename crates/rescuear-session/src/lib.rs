//! RescueAR — Session & Presentation context.
//!
//! The presentation coordinator is the single writer of session state. It
//! turns user commands into sequencer advances, relays the results to
//! narration and pose control, and folds tracking and speech callbacks into
//! the same ordered stream of inputs.

pub mod application;
pub mod domain;
