//! Application layer for the Model Pose context.

pub mod controller;
