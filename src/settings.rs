//! Game settings and tuning
//!
//! Everything that shapes the feel of a run lives in [`Tuning`]; the remote
//! leaderboard endpoint lives in [`LeaderboardConfig`]. Both are persisted
//! together in LocalStorage as one JSON blob.

use serde::{Deserialize, Serialize};

use crate::consts::MIN_VIEWPORT;
use crate::error::ConfigError;

/// Platforms need at least this many cells across the narrowest viewport
const MIN_CELLS_WIDE: f32 = 3.0;

/// Upper bound on the look-ahead; refill generates this far in one tick
const MAX_LOOKAHEAD: f32 = 4000.0;

/// Inclusive range of gap cells between consecutive platforms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapRange {
    pub min: f32,
    pub max: f32,
}

impl GapRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Simulation tuning (feel)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Layout ===
    /// Width of one cell; the unit for platform placement and score
    pub lane_width: f32,
    /// Base vertical spacing between platforms
    pub step_height: f32,
    pub player_radius: f32,

    // === Descent ===
    pub gravity: f32,
    /// Scroll speed at t=0 (units/s)
    pub base_scroll: f32,
    /// Scroll speed gained per second of run time
    pub scroll_accel: f32,
    pub max_scroll: f32,

    // === Lateral control ===
    pub move_accel: f32,
    /// Exponential decay rate applied with no intent held
    pub move_friction: f32,
    pub move_max_speed: f32,
    /// Fraction of lateral speed lost on a wall bounce
    pub bounce_damp: f32,

    // === Landing ===
    pub coyote_time: f32,
    /// How far above a surface the player's feet may be and still land
    pub land_above: f32,
    /// How far below a surface the player's feet may sink and still land
    pub land_below: f32,

    // === Platforms ===
    pub min_len_cells: i32,
    pub max_len_cells: i32,
    /// Gap range at difficulty 0
    pub gap_start: GapRange,
    /// Gap range at difficulty 1
    pub gap_end: GapRange,
    /// Seconds until difficulty progress saturates
    pub ramp_duration: f32,
    /// Max horizontal drift (cells) between consecutive platforms
    pub drift_cells: i32,
    /// How far past the bottom of the viewport the field is kept filled
    pub lookahead: f32,
    /// Platforms above `-trim_margin` are discarded
    pub trim_margin: f32,

    // === Opening ===
    /// Spawn height as a fraction of the viewport height
    pub spawn_ratio: f32,
    /// Safe platform height as a fraction of the viewport height
    pub safe_platform_ratio: f32,
    pub safe_len_cells: (i32, i32),
    pub seed_platforms: u32,
    pub seed_drift_cells: (i32, i32),
    pub seed_flip_chance: f64,
    /// Spacing of the seeded run, in step heights
    pub seed_spacing_steps: (i32, i32),

    // === Run rules ===
    pub max_health: u8,
    /// New landings needed to restore one health point
    pub heal_interval: u32,
    /// Death once the player sinks this far past the bottom
    pub bottom_margin: f32,
    /// Death once the player is carried this far past the top
    pub ceiling_margin: f32,
    /// Real-time seconds after death before a restart is accepted
    pub restart_cooldown: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_width: 16.0,
            step_height: 24.0,
            player_radius: 9.0,

            gravity: 1900.0,
            base_scroll: 340.0,
            scroll_accel: 28.0,
            max_scroll: 980.0,

            move_accel: 2600.0,
            move_friction: 14.0,
            move_max_speed: 720.0,
            bounce_damp: 0.10,

            coyote_time: 0.08,
            land_above: 16.0,
            land_below: 18.0,

            min_len_cells: 5,
            max_len_cells: 18,
            gap_start: GapRange::new(5.0, 12.0),
            gap_end: GapRange::new(3.0, 7.0),
            ramp_duration: 60.0,
            drift_cells: 10,
            lookahead: 240.0,
            trim_margin: 120.0,

            spawn_ratio: 0.28,
            safe_platform_ratio: 0.35,
            safe_len_cells: (10, 14),
            seed_platforms: 8,
            seed_drift_cells: (2, 6),
            seed_flip_chance: 0.35,
            seed_spacing_steps: (2, 3),

            max_health: 3,
            heal_interval: 20,
            bottom_margin: 70.0,
            ceiling_margin: 30.0,
            restart_cooldown: 0.6,
        }
    }
}

impl Tuning {
    /// Reject combinations the generator or physics can't work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("lane_width", self.lane_width),
            ("step_height", self.step_height),
            ("player_radius", self.player_radius),
            ("gravity", self.gravity),
            ("ramp_duration", self.ramp_duration),
            ("move_max_speed", self.move_max_speed),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if self.lane_width * MIN_CELLS_WIDE > MIN_VIEWPORT {
            return Err(ConfigError::Invalid(format!(
                "lane_width must leave {MIN_CELLS_WIDE} cells across a {MIN_VIEWPORT} viewport"
            )));
        }
        let margins = [
            ("lookahead", self.lookahead),
            ("trim_margin", self.trim_margin),
            ("bottom_margin", self.bottom_margin),
            ("ceiling_margin", self.ceiling_margin),
        ];
        for (name, value) in margins {
            if !(value >= 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must not be negative")));
            }
        }
        if self.lookahead > MAX_LOOKAHEAD {
            return Err(ConfigError::Invalid(format!(
                "lookahead must be at most {MAX_LOOKAHEAD}"
            )));
        }
        if self.min_len_cells < 1 || self.min_len_cells > self.max_len_cells {
            return Err(ConfigError::Invalid(
                "platform length range must satisfy 1 <= min <= max".into(),
            ));
        }
        for (name, gap) in [("gap_start", self.gap_start), ("gap_end", self.gap_end)] {
            if gap.min < 0.0 || gap.min > gap.max {
                return Err(ConfigError::Invalid(format!(
                    "{name} must satisfy 0 <= min <= max"
                )));
            }
        }
        if self.max_scroll < self.base_scroll {
            return Err(ConfigError::Invalid(
                "max_scroll must be at least base_scroll".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.bounce_damp) {
            return Err(ConfigError::Invalid("bounce_damp must be in [0, 1]".into()));
        }
        if self.safe_len_cells.0 < 1 || self.safe_len_cells.0 > self.safe_len_cells.1 {
            return Err(ConfigError::Invalid("safe_len_cells must satisfy 1 <= min <= max".into()));
        }
        if self.seed_drift_cells.0 > self.seed_drift_cells.1
            || self.seed_spacing_steps.0 > self.seed_spacing_steps.1
        {
            return Err(ConfigError::Invalid("seed ranges must satisfy min <= max".into()));
        }
        if !(0.0..=1.0).contains(&self.seed_flip_chance) {
            return Err(ConfigError::Invalid("seed_flip_chance must be in [0, 1]".into()));
        }
        if self.max_health == 0 || self.heal_interval == 0 {
            return Err(ConfigError::Invalid(
                "max_health and heal_interval must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Remote leaderboard table (Supabase-style REST)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`. Empty disables it.
    pub url: String,
    /// Public (anon) API key
    pub api_key: String,
    pub table: String,
    /// How many rows the panel shows
    pub top_n: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: "scores".to_string(),
            top_n: 10,
        }
    }
}

impl LeaderboardConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.table.trim().is_empty()
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tuning: Tuning,
    pub leaderboard: LeaderboardConfig,
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon_drop_settings";

    /// Parse and validate a settings blob. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.tuning.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native: read a JSON file if one is given, otherwise defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: Option<&std::path::Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {e}", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"tuning": {"gravity": 1500.0}}"#).unwrap();
        assert_eq!(settings.tuning.gravity, 1500.0);
        assert_eq!(settings.tuning.lane_width, 16.0);
        assert_eq!(settings.leaderboard.table, "scores");
        assert!(!settings.leaderboard.is_configured());
    }

    #[test]
    fn test_invalid_ranges_rejected() {
        let err = Settings::from_json(r#"{"tuning": {"min_len_cells": 9, "max_len_cells": 4}}"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));

        let err = Settings::from_json(r#"{"tuning": {"gap_end": {"min": 8.0, "max": 2.0}}}"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));

        // Fewer than three cells across the narrowest viewport
        let err = Settings::from_json(r#"{"tuning": {"lane_width": 170.0}}"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
        assert!(Settings::from_json(r#"{"tuning": {"lane_width": 106.0}}"#).is_ok());

        for field in ["lookahead", "trim_margin", "bottom_margin", "ceiling_margin"] {
            let json = format!(r#"{{"tuning": {{"{field}": -1.0}}}}"#);
            let err = Settings::from_json(&json);
            assert!(matches!(err, Err(ConfigError::Invalid(_))), "{field}");
        }

        let err = Settings::from_json(r#"{"tuning": {"lookahead": 1.0e9}}"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));

        let err = Settings::from_json("not json");
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_json_roundtrip_preserves_endpoint() {
        let mut settings = Settings::default();
        settings.leaderboard.url = "https://example.supabase.co".into();
        settings.leaderboard.api_key = "anon".into();
        let json = settings.to_json().unwrap();
        let back = Settings::from_json(&json).unwrap();
        assert_eq!(back, settings);
        assert!(back.leaderboard.is_configured());
    }
}
