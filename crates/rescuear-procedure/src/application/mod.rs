//! Application layer for the Procedure context.

pub mod command_handlers;
pub mod loader;
pub mod query_handlers;
