//! Per-frame simulation tick
//!
//! Advances one [`GameState`] by a clamped time step: scroll and refill the
//! field, move the player, resolve landings and damage, then check bounds.

use super::difficulty;
use super::physics;
use super::state::{DeathCause, GameEvent, GameState, MoveIntent};
use crate::consts::MAX_FRAME_DT;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement intent
    pub intent: MoveIntent,
    /// Start / restart request (one-shot)
    pub start: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Real-time clock in seconds, used for the restart cooldown
    pub now: f64,
}

/// Advance the game state by `dt` seconds (clamped to [`MAX_FRAME_DT`])
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.start {
        state.start(input.now);
    }
    if input.pause {
        state.toggle_pause();
    }

    // Only a running game advances
    if !state.is_running() {
        return;
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);

    // Descent and score
    state.elapsed += dt;
    state.scroll_speed = difficulty::scroll_speed(&state.tuning, state.elapsed);
    let descended = state.scroll_speed * dt;
    state.add_distance(descended);

    // Field: scroll, trim, then refill against the trimmed set
    state.field.scroll(descended);
    state.field.trim(&state.tuning);
    let progress = difficulty::progress(state.elapsed, state.tuning.ramp_duration);
    state
        .field
        .refill(&state.tuning, state.viewport, progress, &mut state.rng);

    // Player
    physics::step_free(
        &mut state.player,
        input.intent,
        &state.tuning,
        state.viewport,
        dt,
    );

    match physics::find_landing(&state.player, &state.field.platforms, &state.tuning) {
        Some(landing) => {
            if physics::is_hard_impact(&state.player, &state.tuning, state.viewport)
                && state.take_damage()
            {
                state.end_run(DeathCause::HealthDepleted, input.now);
                return;
            }
            if physics::settle(&mut state.player, &landing, &state.tuning) {
                log::debug!("Landed on platform {}", landing.platform_id);
                state.events.push(GameEvent::Landed {
                    platform_id: landing.platform_id,
                });
                state.register_landing();
            }
        }
        None => physics::drift_airborne(&mut state.player, dt),
    }

    if let Some(cause) = physics::bounds_check(&state.player, &state.tuning, state.viewport) {
        state.end_run(cause, input.now);
    }
}
