//! Domain layer for the Model Pose context.

pub mod model;
pub mod transition;
