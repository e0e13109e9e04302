//! RescueAR — console host.
//!
//! Wires a simulated sensor, a console speech engine and a log-based
//! renderer around the presentation coordinator.

pub mod config;
pub mod console;
pub mod error;
pub mod model;
pub mod renderer;
pub mod sensor;
pub mod session;
pub mod speech;
