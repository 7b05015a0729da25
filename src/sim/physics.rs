//! Player physics and platform collision
//!
//! Camera space: y grows downward, platforms scroll upward, the player falls
//! under gravity. The session calls these steps in order each tick:
//!
//! 1. [`step_free`] - lateral control, gravity, integration, wall bounce
//! 2. [`find_landing`] - topmost platform the feet have reached
//! 3. [`is_hard_impact`] - fall damage check (before snapping)
//! 4. [`settle`] or [`drift_airborne`]
//! 5. [`bounds_check`] - bottom / ceiling

use super::state::{DeathCause, MoveIntent, Platform, Player, Viewport};
use crate::settings::Tuning;

/// A platform the player is touching down on this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub platform_id: u32,
    pub surface_y: f32,
}

/// Accelerate toward the held direction, or decay exponentially with no net
/// intent. Result is clamped to the max lateral speed.
pub fn apply_lateral(player: &mut Player, intent: MoveIntent, tuning: &Tuning, dt: f32) {
    let axis = intent.axis();
    if axis != 0.0 {
        player.vel.x += axis * tuning.move_accel * dt;
    } else {
        player.vel.x *= (-tuning.move_friction * dt).exp();
    }
    player.vel.x = player
        .vel
        .x
        .clamp(-tuning.move_max_speed, tuning.move_max_speed);
}

/// Clamp to the side walls and bounce inelastically.
/// Returns true when a wall was hit.
pub fn resolve_walls(player: &mut Player, tuning: &Tuning, width: f32) -> bool {
    let min_x = player.radius;
    let max_x = width - player.radius;
    let restitution = 1.0 - tuning.bounce_damp;

    if player.pos.x < min_x {
        player.pos.x = min_x;
        player.vel.x = -player.vel.x * restitution;
        true
    } else if player.pos.x > max_x {
        player.pos.x = max_x;
        player.vel.x = -player.vel.x * restitution;
        true
    } else {
        false
    }
}

/// Unconstrained motion for one tick. Returns true on a wall bounce.
pub fn step_free(
    player: &mut Player,
    intent: MoveIntent,
    tuning: &Tuning,
    viewport: Viewport,
    dt: f32,
) -> bool {
    apply_lateral(player, intent, tuning, dt);
    player.vel.y += tuning.gravity * dt;
    player.pos += player.vel * dt;
    resolve_walls(player, tuning, viewport.width)
}

/// Whether the player's feet are close enough to `platform` to land on it
pub fn qualifies(player: &Player, platform: &Platform, tuning: &Tuning) -> bool {
    let x = player.pos.x;
    let within_x = x >= platform.x0 - player.radius && x <= platform.x1 + player.radius;
    if !within_x || player.vel.y < 0.0 {
        return false;
    }
    let dy = player.feet() - platform.y;
    dy >= -tuning.land_above && dy <= tuning.land_below
}

/// Highest (smallest y) qualifying platform. Ties keep the earliest generated.
pub fn find_landing(player: &Player, platforms: &[Platform], tuning: &Tuning) -> Option<Landing> {
    let mut best: Option<Landing> = None;
    for platform in platforms {
        if !qualifies(player, platform, tuning) {
            continue;
        }
        if best.is_none_or(|b| platform.y < b.surface_y) {
            best = Some(Landing {
                platform_id: platform.id,
                surface_y: platform.y,
            });
        }
    }
    best
}

/// Impact speed equivalent to a free fall through a third of the viewport
pub fn fall_damage_threshold(tuning: &Tuning, viewport: Viewport) -> f32 {
    (2.0 * tuning.gravity * viewport.height / 3.0).sqrt()
}

/// Whether landing at the current downward speed costs health
pub fn is_hard_impact(player: &Player, tuning: &Tuning, viewport: Viewport) -> bool {
    player.vel.y >= fall_damage_threshold(tuning, viewport)
}

/// Snap onto the surface. Returns true for a fresh touchdown (the player was
/// airborne on the previous tick).
pub fn settle(player: &mut Player, landing: &Landing, tuning: &Tuning) -> bool {
    let was_grounded = player.grounded;
    player.pos.y = landing.surface_y - player.radius;
    player.vel.y = 0.0;
    player.grounded = true;
    player.coyote = tuning.coyote_time;
    !was_grounded
}

/// No surface this tick: leave the ground and run down the grace timer
pub fn drift_airborne(player: &mut Player, dt: f32) {
    player.grounded = false;
    player.coyote = (player.coyote - dt).max(0.0);
}

/// Bottom is checked before the ceiling
pub fn bounds_check(player: &Player, tuning: &Tuning, viewport: Viewport) -> Option<DeathCause> {
    if player.pos.y > viewport.height + tuning.bottom_margin {
        Some(DeathCause::FellOffBottom)
    } else if player.pos.y < -tuning.ceiling_margin {
        Some(DeathCause::HitCeiling)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn platform(id: u32, y: f32, x0: f32, x1: f32) -> Platform {
        Platform {
            id,
            y,
            x0,
            x1,
            cells: ((x1 - x0) / 16.0) as i32,
            hue: 200.0,
            phase: 0.0,
        }
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), 9.0)
    }

    #[test]
    fn test_lateral_accel_and_clamp() {
        let tuning = Tuning::default();
        let mut player = player_at(100.0, 100.0);
        apply_lateral(&mut player, MoveIntent::RIGHT, &tuning, 0.1);
        assert!((player.vel.x - 260.0).abs() < 0.01);

        for _ in 0..20 {
            apply_lateral(&mut player, MoveIntent::RIGHT, &tuning, 0.1);
        }
        assert_eq!(player.vel.x, tuning.move_max_speed);

        apply_lateral(&mut player, MoveIntent::LEFT, &tuning, 1.0);
        assert_eq!(player.vel.x, -tuning.move_max_speed);
    }

    #[test]
    fn test_friction_decays_exponentially() {
        let tuning = Tuning::default();
        let mut player = player_at(100.0, 100.0);
        player.vel.x = 500.0;
        apply_lateral(&mut player, MoveIntent::NONE, &tuning, 0.05);
        let expected = 500.0 * (-tuning.move_friction * 0.05).exp();
        assert!((player.vel.x - expected).abs() < 0.01);

        // Both held cancels out and decays too
        let before = player.vel.x;
        apply_lateral(
            &mut player,
            MoveIntent { left: true, right: true },
            &tuning,
            0.05,
        );
        assert!(player.vel.x < before && player.vel.x > 0.0);
    }

    #[test]
    fn test_wall_bounce_is_inelastic() {
        let tuning = Tuning::default();
        let mut player = player_at(475.0, 100.0);
        player.vel.x = 600.0;
        assert!(resolve_walls(&mut player, &tuning, 480.0));
        assert_eq!(player.pos.x, 471.0);
        assert!((player.vel.x + 540.0).abs() < 0.01);

        let mut player = player_at(2.0, 100.0);
        player.vel.x = -100.0;
        assert!(resolve_walls(&mut player, &tuning, 480.0));
        assert_eq!(player.pos.x, 9.0);
        assert!((player.vel.x - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_landing_tolerance_band() {
        let tuning = Tuning::default();
        let p = platform(1, 200.0, 100.0, 200.0);
        let mut player = player_at(150.0, 0.0);
        player.vel.y = 100.0;

        // feet 16 above the surface: lands
        player.pos.y = 200.0 - 16.0 - 9.0;
        assert!(qualifies(&player, &p, &tuning));
        // feet 17 above: too high
        player.pos.y = 200.0 - 17.0 - 9.0;
        assert!(!qualifies(&player, &p, &tuning));
        // feet 18 below: still lands
        player.pos.y = 200.0 + 18.0 - 9.0;
        assert!(qualifies(&player, &p, &tuning));
        // feet 19 below: fell through
        player.pos.y = 200.0 + 19.0 - 9.0;
        assert!(!qualifies(&player, &p, &tuning));
    }

    #[test]
    fn test_landing_needs_downward_motion_and_overlap() {
        let tuning = Tuning::default();
        let p = platform(1, 200.0, 100.0, 200.0);
        let mut player = player_at(150.0, 191.0);
        player.vel.y = -10.0;
        assert!(!qualifies(&player, &p, &tuning));

        player.vel.y = 0.0;
        assert!(qualifies(&player, &p, &tuning));

        // Edge overlap widened by the radius
        player.pos.x = 209.0;
        assert!(qualifies(&player, &p, &tuning));
        player.pos.x = 209.5;
        assert!(!qualifies(&player, &p, &tuning));
    }

    #[test]
    fn test_find_landing_prefers_highest() {
        let tuning = Tuning::default();
        let platforms = vec![
            platform(1, 210.0, 100.0, 200.0),
            platform(2, 200.0, 120.0, 220.0),
            platform(3, 205.0, 0.0, 300.0),
        ];
        let mut player = player_at(150.0, 200.0 - 9.0 + 5.0);
        player.vel.y = 50.0;
        let landing = find_landing(&player, &platforms, &tuning).unwrap();
        assert_eq!(landing.platform_id, 2);
        assert_eq!(landing.surface_y, 200.0);

        // Order doesn't matter
        let reversed: Vec<_> = platforms.into_iter().rev().collect();
        assert_eq!(find_landing(&player, &reversed, &tuning).unwrap().platform_id, 2);
    }

    #[test]
    fn test_find_landing_none_when_empty() {
        let tuning = Tuning::default();
        let player = player_at(150.0, 100.0);
        assert!(find_landing(&player, &[], &tuning).is_none());
    }

    #[test]
    fn test_fall_damage_threshold() {
        let tuning = Tuning::default();
        let vp = Viewport::new(480.0, 720.0);
        let threshold = fall_damage_threshold(&tuning, vp);
        assert!((threshold - (2.0f32 * 1900.0 * 240.0).sqrt()).abs() < 0.01);

        let mut player = player_at(0.0, 0.0);
        player.vel.y = threshold - 1.0;
        assert!(!is_hard_impact(&player, &tuning, vp));
        player.vel.y = threshold;
        assert!(is_hard_impact(&player, &tuning, vp));
    }

    #[test]
    fn test_settle_reports_fresh_touchdown_once() {
        let tuning = Tuning::default();
        let landing = Landing {
            platform_id: 4,
            surface_y: 300.0,
        };
        let mut player = player_at(100.0, 295.0);
        player.vel.y = 400.0;
        assert!(settle(&mut player, &landing, &tuning));
        assert_eq!(player.pos.y, 291.0);
        assert_eq!(player.vel.y, 0.0);
        assert!(player.grounded);
        assert_eq!(player.coyote, tuning.coyote_time);

        // Continued contact
        assert!(!settle(&mut player, &landing, &tuning));

        drift_airborne(&mut player, 0.05);
        assert!(!player.grounded);
        assert!((player.coyote - 0.03).abs() < 1e-6);
        drift_airborne(&mut player, 0.05);
        assert_eq!(player.coyote, 0.0);
        assert!(settle(&mut player, &landing, &tuning));
    }

    #[test]
    fn test_bounds_check() {
        let tuning = Tuning::default();
        let vp = Viewport::new(480.0, 720.0);
        assert_eq!(bounds_check(&player_at(100.0, 300.0), &tuning, vp), None);
        assert_eq!(
            bounds_check(&player_at(100.0, 791.0), &tuning, vp),
            Some(DeathCause::FellOffBottom)
        );
        assert_eq!(bounds_check(&player_at(100.0, 790.0), &tuning, vp), None);
        assert_eq!(
            bounds_check(&player_at(100.0, -31.0), &tuning, vp),
            Some(DeathCause::HitCeiling)
        );
    }
}
