//! Neon Drop - an endless neon platform-descent arcade game
//!
//! Core modules:
//! - `sim`: Simulation (field generation, physics, run state machine)
//! - `game`: Frame driver tying the simulation to input, storage and leaderboard
//! - `leaderboard`: Remote top-N table client
//! - `persistence`: Key-value storage for best score and player name
//! - `platform`: Browser/native input mapping and frame timing
//! - `settings`: Data-driven tuning and endpoint configuration

pub mod error;
pub mod game;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, LeaderboardError, NameError, StorageError};
pub use game::Game;
pub use settings::{Settings, Tuning};

/// Game configuration constants
pub mod consts {
    /// Largest step a single frame may simulate (stall protection)
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;
    /// Step used by the headless demo and tests (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Smallest logical viewport edge
    pub const MIN_VIEWPORT: f32 = 320.0;

    /// Display names are capped at this many characters
    pub const NAME_MAX_CHARS: usize = 16;

    /// Storage keys
    pub const BEST_SCORE_KEY: &str = "neon_drop_best";
    pub const PLAYER_NAME_KEY: &str = "neon_drop_name";
}
