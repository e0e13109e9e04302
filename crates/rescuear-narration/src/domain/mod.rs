//! Domain layer for the Narration context.

pub mod status;
