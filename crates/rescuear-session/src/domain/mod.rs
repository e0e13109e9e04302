//! Domain layer for the Session & Presentation context.

pub mod commands;
pub mod events;
pub mod inputs;
pub mod state;
