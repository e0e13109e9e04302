//! RescueAR — Model Pose context.
//!
//! Owns the figure's placement in the world and applies discrete, timed
//! pose transitions. Only settled poses are observable from outside.

pub mod application;
pub mod domain;
