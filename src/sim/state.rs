//! Run state and core simulation types
//!
//! A [`GameState`] is one self-contained simulation: player, platform field,
//! score, health and the run state machine. Nothing here is global, so any
//! number of runs can coexist (tests rely on this).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::field::PlatformField;
use super::rng::GameRng;
use crate::consts::MIN_VIEWPORT;
use crate::settings::Tuning;

/// Logical play area (layout size, not device pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(MIN_VIEWPORT),
            height: height.max(MIN_VIEWPORT),
        }
    }
}

/// Left/right movement intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    pub const NONE: MoveIntent = MoveIntent { left: false, right: false };
    pub const LEFT: MoveIntent = MoveIntent { left: true, right: false };
    pub const RIGHT: MoveIntent = MoveIntent { left: false, right: true };

    /// -1, 0 or 1; both held cancels out
    pub fn axis(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }
}

/// The falling ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Resting on a platform this tick
    pub grounded: bool,
    /// Seconds of post-leave grace remaining (tracked, not used for forgiveness)
    pub coyote: f32,
}

impl Player {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            grounded: false,
            coyote: 0.0,
        }
    }

    /// Lower edge of the ball
    #[inline]
    pub fn feet(&self) -> f32 {
        self.pos.y + self.radius
    }
}

/// A glowing platform. `y` is the top surface in camera space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub y: f32,
    pub x0: f32,
    pub x1: f32,
    /// Span length in cells
    pub cells: i32,
    /// Cosmetic hue in degrees
    pub hue: f32,
    /// Cosmetic wobble phase in radians
    pub phase: f32,
}

impl Platform {
    #[inline]
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) * 0.5
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    HealthDepleted,
    FellOffBottom,
    HitCeiling,
}

impl DeathCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::HealthDepleted => "health depleted",
            DeathCause::FellOffBottom => "fell off bottom",
            DeathCause::HitCeiling => "hit ceiling",
        }
    }
}

/// Run state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Before the first run
    Idle,
    Running,
    Paused,
    Dead { cause: DeathCause, final_score: u64 },
}

/// Things that happened during a tick, drained by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    /// A fresh touchdown (not continued contact)
    Landed { platform_id: u32 },
    Damaged { health: u8 },
    Healed { health: u8 },
    Paused,
    Resumed,
    Died { cause: DeathCause, score: u64 },
    NewBest { score: u64 },
}

/// One simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub phase: RunPhase,
    /// Run time in seconds (simulated, clamped steps)
    pub elapsed: f32,
    /// Current descent rate
    pub scroll_speed: f32,
    pub score: u64,
    /// Sub-cell remainder of descended distance
    score_acc: f64,
    pub health: u8,
    /// New landings this run
    pub landings: u32,
    /// Landing count at which the next health point is restored
    pub next_heal_at: u32,
    /// Best score across runs (seeded by the driver from storage)
    pub best: u64,
    /// Real-time timestamp (seconds) of the last death
    pub died_at: Option<f64>,
    /// Incremented on each start
    pub run_id: u32,
    pub player: Player,
    pub field: PlatformField,
    /// Pending events (drain with [`GameState::take_events`])
    pub events: Vec<GameEvent>,
    pub(crate) rng: GameRng,
}

impl GameState {
    /// Create an idle game with a freshly seeded field
    pub fn new(tuning: Tuning, viewport: Viewport, seed: u64) -> Self {
        let radius = tuning.player_radius;
        let mut state = Self {
            tuning,
            viewport,
            phase: RunPhase::Idle,
            elapsed: 0.0,
            scroll_speed: 0.0,
            score: 0,
            score_acc: 0.0,
            health: 0,
            landings: 0,
            next_heal_at: 0,
            best: 0,
            died_at: None,
            run_id: 0,
            player: Player::new(Vec2::ZERO, radius),
            field: PlatformField::new(),
            events: Vec::new(),
            rng: GameRng::new(seed),
        };
        state.reset_world();
        state
    }

    /// Put everything back to the opening layout
    pub fn reset_world(&mut self) {
        let t = &self.tuning;
        self.elapsed = 0.0;
        self.scroll_speed = t.base_scroll;
        self.score = 0;
        self.score_acc = 0.0;
        self.health = t.max_health;
        self.landings = 0;
        self.next_heal_at = t.heal_interval;
        self.died_at = None;

        let spawn = Vec2::new(self.viewport.width * 0.5, self.viewport.height * t.spawn_ratio);
        self.player = Player::new(spawn, t.player_radius);
        self.field.reset(t, self.viewport, spawn.x, &mut self.rng);
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.phase, RunPhase::Dead { .. })
    }

    /// Whether a restart at `now` would be accepted
    pub fn can_restart(&self, now: f64) -> bool {
        match (self.phase, self.died_at) {
            (RunPhase::Running | RunPhase::Paused, _) => false,
            (RunPhase::Dead { .. }, Some(died_at)) => now - died_at >= self.tuning.restart_cooldown,
            _ => true,
        }
    }

    /// Start (from Idle) or restart (from Dead, after the cooldown).
    /// Returns false when the request was ignored.
    pub fn start(&mut self, now: f64) -> bool {
        if !self.can_restart(now) {
            return false;
        }
        self.reset_world();
        self.phase = RunPhase::Running;
        self.run_id += 1;
        self.events.push(GameEvent::RunStarted);
        log::info!("Run {} started", self.run_id);
        true
    }

    /// Running <-> Paused. No-op from Idle or Dead.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            RunPhase::Running => {
                self.phase = RunPhase::Paused;
                self.events.push(GameEvent::Paused);
                true
            }
            RunPhase::Paused => {
                self.phase = RunPhase::Running;
                self.events.push(GameEvent::Resumed);
                true
            }
            _ => false,
        }
    }

    /// Add descended distance; returns the whole cells credited to the score
    pub fn add_distance(&mut self, distance: f32) -> u64 {
        self.score_acc += distance as f64 / self.tuning.lane_width as f64;
        let whole = self.score_acc.floor();
        if whole >= 1.0 {
            self.score += whole as u64;
            self.score_acc -= whole;
            whole as u64
        } else {
            0
        }
    }

    /// Lose one health point. Returns true when health hit zero.
    pub fn take_damage(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.events.push(GameEvent::Damaged { health: self.health });
        log::debug!("Hard landing, health now {}", self.health);
        self.health == 0
    }

    /// Count a fresh touchdown and heal on every `heal_interval`-th one
    pub fn register_landing(&mut self) {
        self.landings += 1;
        if self.landings >= self.next_heal_at {
            if self.health < self.tuning.max_health {
                self.health += 1;
                self.events.push(GameEvent::Healed { health: self.health });
            }
            self.next_heal_at += self.tuning.heal_interval;
        }
    }

    /// Running -> Dead
    pub fn end_run(&mut self, cause: DeathCause, now: f64) {
        self.phase = RunPhase::Dead {
            cause,
            final_score: self.score,
        };
        self.died_at = Some(now);
        self.events.push(GameEvent::Died {
            cause,
            score: self.score,
        });
        log::info!("Run {} over ({}), score {}", self.run_id, cause.as_str(), self.score);

        if self.score > self.best {
            self.best = self.score;
            self.events.push(GameEvent::NewBest { score: self.score });
            log::info!("New best: {}", self.best);
        }
    }

    /// Layout size changed. An idle field is reseeded for the new size; during
    /// a run the existing platforms are squeezed into the new width.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.phase == RunPhase::Idle {
            self.reset_world();
        } else {
            self.field.refit(&self.tuning, viewport);
        }
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(Tuning::default(), Viewport::new(480.0, 720.0), 42)
    }

    #[test]
    fn test_new_state_is_idle_with_field() {
        let state = state();
        assert_eq!(state.phase, RunPhase::Idle);
        assert!(!state.field.platforms.is_empty());
        assert_eq!(state.health, 3);
        assert_eq!(state.next_heal_at, 20);
    }

    #[test]
    fn test_shrinking_mid_run_keeps_platforms_in_field() {
        let mut state = GameState::new(Tuning::default(), Viewport::new(1400.0, 720.0), 3);
        assert!(state.start(0.0));
        state.set_viewport(Viewport::new(320.0, 720.0));
        assert!(state.is_running());

        for _ in 0..30 {
            crate::sim::tick(&mut state, &crate::sim::TickInput::default(), crate::consts::SIM_DT);
        }
        assert!(!state.field.platforms.is_empty());
        for p in &state.field.platforms {
            assert!(p.x0 >= 0.0 && p.x1 <= 320.0, "out of field {p:?}");
            assert!(p.x1 > p.x0);
        }
    }

    #[test]
    fn test_viewport_minimum() {
        let vp = Viewport::new(100.0, 900.0);
        assert_eq!(vp.width, MIN_VIEWPORT);
        assert_eq!(vp.height, 900.0);
    }

    #[test]
    fn test_score_accumulator_carries_remainder() {
        let mut state = state();
        // 16 units per cell: 10 + 10 + 12 = 32 -> exactly 2 cells
        assert_eq!(state.add_distance(10.0), 0);
        assert_eq!(state.add_distance(10.0), 1);
        assert_eq!(state.add_distance(12.0), 1);
        assert_eq!(state.score, 2);
        assert_eq!(state.add_distance(48.0), 3);
        assert_eq!(state.score, 5);
    }

    #[test]
    fn test_twenty_landings_heal_once() {
        let mut state = state();
        state.health = 1;
        for _ in 0..19 {
            state.register_landing();
        }
        assert_eq!(state.health, 1);
        assert_eq!(state.next_heal_at, 20);

        state.register_landing();
        assert_eq!(state.health, 2);
        assert_eq!(state.next_heal_at, 40);
        assert!(state.events.contains(&GameEvent::Healed { health: 2 }));
    }

    #[test]
    fn test_heal_never_exceeds_max() {
        let mut state = state();
        assert_eq!(state.health, state.tuning.max_health);
        for _ in 0..20 {
            state.register_landing();
        }
        assert_eq!(state.health, state.tuning.max_health);
        assert_eq!(state.next_heal_at, 40);
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::Healed { .. })));
    }

    #[test]
    fn test_damage_saturates_at_zero() {
        let mut state = state();
        state.health = 1;
        assert!(state.take_damage());
        assert!(state.take_damage());
        assert_eq!(state.health, 0);
    }

    #[test]
    fn test_pause_only_while_running() {
        let mut state = state();
        assert!(!state.toggle_pause());
        assert_eq!(state.phase, RunPhase::Idle);

        assert!(state.start(0.0));
        assert!(state.toggle_pause());
        assert_eq!(state.phase, RunPhase::Paused);
        assert!(state.toggle_pause());
        assert_eq!(state.phase, RunPhase::Running);

        state.end_run(DeathCause::HitCeiling, 1.0);
        assert!(!state.toggle_pause());
        assert!(state.is_dead());
    }

    #[test]
    fn test_restart_cooldown() {
        let mut state = state();
        assert!(state.start(0.0));
        // Start while running is ignored
        assert!(!state.start(0.1));
        assert_eq!(state.run_id, 1);

        state.tuning.restart_cooldown = 0.5;
        state.end_run(DeathCause::FellOffBottom, 10.0);

        assert!(!state.start(10.25));
        assert!(state.is_dead());
        assert_eq!(state.run_id, 1);

        assert!(state.start(10.5));
        assert!(state.is_running());
        assert_eq!(state.run_id, 2);
    }

    #[test]
    fn test_death_updates_best_only_when_beaten() {
        let mut state = state();
        state.best = 50;
        state.start(0.0);
        state.score = 30;
        state.end_run(DeathCause::FellOffBottom, 1.0);
        assert_eq!(state.best, 50);
        assert_eq!(
            state.phase,
            RunPhase::Dead {
                cause: DeathCause::FellOffBottom,
                final_score: 30
            }
        );

        state.start(5.0);
        state.score = 80;
        state.end_run(DeathCause::HitCeiling, 6.0);
        assert_eq!(state.best, 80);
        assert!(state.take_events().contains(&GameEvent::NewBest { score: 80 }));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_start_resets_run() {
        let mut state = state();
        state.start(0.0);
        state.score = 99;
        state.health = 1;
        state.landings = 7;
        state.end_run(DeathCause::HitCeiling, 0.0);
        state.start(1.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.health, state.tuning.max_health);
        assert_eq!(state.landings, 0);
        assert_eq!(state.died_at, None);
        assert_eq!(state.player.vel, Vec2::ZERO);
    }
}
