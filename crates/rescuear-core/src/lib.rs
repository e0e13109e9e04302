//! RescueAR Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits, value types and infrastructure
//! ports that every component depends on. It contains no runtime code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod geometry;
pub mod sensor;
pub mod speech;
