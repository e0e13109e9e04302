//! Domain layer for the World Tracking context.

pub mod frames;
pub mod options;
