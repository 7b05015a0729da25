//! Simulation module
//!
//! All gameplay logic lives here. No rendering, storage or network access:
//! - Explicit `tick(state, input, dt)` with clamped steps
//! - Seeded RNG only
//! - One `GameState` per run context, no globals

pub mod difficulty;
pub mod field;
pub mod physics;
pub mod rng;
pub mod state;
pub mod tick;

pub use field::PlatformField;
pub use physics::Landing;
pub use rng::GameRng;
pub use state::{
    DeathCause, GameEvent, GameState, MoveIntent, Platform, Player, RunPhase, Viewport,
};
pub use tick::{TickInput, tick};
