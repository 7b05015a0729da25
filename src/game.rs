//! Frame driver
//!
//! Owns one simulation and everything around it: held input, the frame clock,
//! the stored profile and the leaderboard client. The host calls
//! [`Game::frame`] once per display frame and forwards input events.

use std::rc::Rc;

use crate::error::LeaderboardError;
use crate::leaderboard::{LeaderboardBackend, LeaderboardClient, LeaderboardTask};
use crate::persistence::{KeyValueStore, Profile};
use crate::platform::{Command, FrameClock, InputState};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, RunPhase, TickInput, Viewport, tick};

pub struct Game {
    state: GameState,
    input: InputState,
    clock: FrameClock,
    profile: Profile,
    leaderboard: LeaderboardClient,
    /// One-shot requests consumed by the next step
    pending_start: bool,
    pending_pause: bool,
}

impl Game {
    pub fn new(
        settings: &Settings,
        viewport: Viewport,
        seed: u64,
        store: Rc<dyn KeyValueStore>,
        backend: Rc<dyn LeaderboardBackend>,
    ) -> Self {
        let profile = Profile::new(store);
        let mut state = GameState::new(settings.tuning.clone(), viewport, seed);
        state.best = profile.best_score();
        let leaderboard =
            LeaderboardClient::new(backend, profile.clone(), settings.leaderboard.top_n);
        log::info!("Game ready (seed {seed}, best {})", state.best);

        Self {
            state,
            input: InputState::new(),
            clock: FrameClock::new(),
            profile,
            leaderboard,
            pending_start: false,
            pending_pause: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for tooling and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn leaderboard(&self) -> &LeaderboardClient {
        &self.leaderboard
    }

    /// Forward a key press. Returns true if the key belongs to the game.
    pub fn key_down(&mut self, key: &str) -> bool {
        match self.input.key_down(key) {
            Some(Command::Start) => self.request_start(),
            Some(Command::Pause) => self.request_pause(),
            None => {}
        }
        InputState::is_movement_key(key) || key.eq_ignore_ascii_case("escape")
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    pub fn pointer_down(&mut self, id: i32, x: f32) {
        self.input.pointer_down(id, x, self.state.viewport.width);
    }

    pub fn pointer_move(&mut self, id: i32, x: f32) {
        self.input.pointer_move(id, x, self.state.viewport.width);
    }

    pub fn pointer_up(&mut self, id: i32) {
        self.input.pointer_up(id);
    }

    /// Start or restart on the next step (ignored during the cooldown)
    pub fn request_start(&mut self) {
        self.pending_start = true;
    }

    /// Toggle pause on the next step
    pub fn request_pause(&mut self) {
        self.pending_pause = true;
    }

    /// Focus lost or tab hidden: pause a running game and drop held input
    pub fn auto_pause(&mut self) {
        self.input.release_all();
        self.clock.reset();
        match self.state.phase {
            RunPhase::Running if !self.pending_pause => {
                self.pending_pause = true;
                log::info!("Auto-paused");
            }
            // A queued resume must not fire while hidden
            RunPhase::Paused => self.pending_pause = false,
            _ => {}
        }
    }

    /// Layout size changed
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.set_viewport(Viewport::new(width, height));
    }

    /// Advance by the time since the previous frame (`now_ms` from the frame
    /// callback). Returns what happened.
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let dt = self.clock.advance(now_ms);
        self.step(dt, now_ms / 1000.0)
    }

    /// Advance by an explicit `dt`; `now` is real time in seconds
    pub fn step(&mut self, dt: f32, now: f64) -> Vec<GameEvent> {
        let input = TickInput {
            intent: self.input.intent(),
            start: std::mem::take(&mut self.pending_start),
            pause: std::mem::take(&mut self.pending_pause),
            now,
        };
        tick(&mut self.state, &input, dt);

        let events = self.state.take_events();
        for event in &events {
            if let GameEvent::NewBest { score } = event {
                self.profile.save_best_score(*score);
            }
        }
        events
    }

    /// Submit the finished run's score under `name`
    pub fn submit_score(&self, name: &str) -> Result<LeaderboardTask, LeaderboardError> {
        match self.state.phase {
            RunPhase::Dead { final_score, .. } => self.leaderboard.submit(name, final_score),
            _ => Err(LeaderboardError::NoFinishedRun),
        }
    }

    pub fn refresh_leaderboard(&self) -> LeaderboardTask {
        self.leaderboard.refresh()
    }
}
