//! Application layer for the Session & Presentation context.

pub mod coordinator;
pub mod event_bus;
pub mod handle;
