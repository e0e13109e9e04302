//! Application layer for the World Tracking context.

pub mod session;
