//! Domain layer for the Procedure context.

pub mod aggregates;
pub mod commands;
pub mod document;
pub mod events;
pub mod procedure;
