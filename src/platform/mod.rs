//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (frame clock, wall-clock timestamps)
//! - Input events (keys and pointers to movement intents)

pub mod input;
pub mod time;

pub use input::{Command, InputState};
pub use time::FrameClock;
