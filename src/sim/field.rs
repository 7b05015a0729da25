//! Platform field generation
//!
//! Keeps the field filled a fixed look-ahead past the bottom of the viewport,
//! discards platforms that scrolled off the top, and seeds an easy opening on
//! reset. Platforms are kept in generation order; the last one anchors the
//! horizontal drift of the next.

use std::f32::consts::TAU;

use super::difficulty;
use super::rng::GameRng;
use super::state::{Platform, Viewport};
use crate::settings::Tuning;

/// Vertical spacing contributed by one gap cell, as a fraction of step height
const GAP_CELL_FACTOR: f32 = 0.35;

/// Number of whole cells across the viewport
#[inline]
pub fn cells_wide(tuning: &Tuning, viewport: Viewport) -> i32 {
    (viewport.width / tuning.lane_width).floor() as i32
}

/// Cap a length so it fits with a one-cell margin on both sides
fn fit_len(len: i32, cells_wide: i32) -> i32 {
    len.min(cells_wide - 2).max(1)
}

/// Clamp a left-edge cell so the whole platform stays in the playfield
fn clamp_cell(cell_x: i32, len: i32, cells_wide: i32) -> i32 {
    let hi = (cells_wide - len - 1).max(1);
    cell_x.clamp(1, hi)
}

/// The set of live platforms plus the id allocator
#[derive(Debug, Clone, Default)]
pub struct PlatformField {
    pub platforms: Vec<Platform>,
    next_id: u32,
}

impl PlatformField {
    pub fn new() -> Self {
        Self {
            platforms: Vec::new(),
            next_id: 1,
        }
    }

    /// Largest spacing between consecutive generated platforms at `progress`
    pub fn max_spacing(tuning: &Tuning, progress: f32) -> f32 {
        let gap = difficulty::gap_range(tuning, progress);
        gap.max.floor() * tuning.step_height * GAP_CELL_FACTOR + tuning.step_height
    }

    /// Largest `y` in the field (the deepest platform)
    pub fn bottom_y(&self) -> Option<f32> {
        self.platforms.iter().map(|p| p.y).reduce(f32::max)
    }

    /// Drop everything and lay out the opening: a wide safe platform under the
    /// spawn point followed by a gentle random walk.
    pub fn reset(&mut self, tuning: &Tuning, viewport: Viewport, spawn_x: f32, rng: &mut GameRng) {
        self.platforms.clear();
        let cells = cells_wide(tuning, viewport);

        // Safe landing right under the player
        let safe_len = fit_len(
            rng.range_i32(tuning.safe_len_cells.0, tuning.safe_len_cells.1),
            cells,
        );
        let spawn_cell = spawn_x / tuning.lane_width;
        let safe_x = clamp_cell(
            (spawn_cell - safe_len as f32 * 0.5).round() as i32,
            safe_len,
            cells,
        );
        let mut y = viewport.height * tuning.safe_platform_ratio;
        self.push(tuning, y, safe_x, safe_len, rng);

        // Sparse, wide-spaced run below it
        let len_lo = (tuning.min_len_cells + 2).min(tuning.max_len_cells);
        let len_hi = (tuning.max_len_cells - 2).max(len_lo);
        let mut x = safe_x;
        let mut dir = rng.sign();
        for _ in 0..tuning.seed_platforms {
            let steps = rng.range_i32(tuning.seed_spacing_steps.0, tuning.seed_spacing_steps.1);
            y += steps.max(1) as f32 * tuning.step_height;

            let len = fit_len(rng.range_i32(len_lo, len_hi), cells);
            let drift = rng.range_i32(tuning.seed_drift_cells.0, tuning.seed_drift_cells.1);
            x = clamp_cell(x + dir * drift, len, cells);
            self.push(tuning, y, x, len, rng);

            if rng.chance(tuning.seed_flip_chance) {
                dir = -dir;
            }
        }
    }

    /// Move every platform up by `dy` (the player descends by the same amount)
    pub fn scroll(&mut self, dy: f32) {
        for platform in &mut self.platforms {
            platform.y -= dy;
        }
    }

    /// Squeeze existing spans into a new viewport width, keeping each one
    /// near its old position
    pub fn refit(&mut self, tuning: &Tuning, viewport: Viewport) {
        let cells = cells_wide(tuning, viewport);
        for platform in &mut self.platforms {
            let len = fit_len(platform.cells, cells);
            let cell_x = clamp_cell((platform.x0 / tuning.lane_width).round() as i32, len, cells);
            platform.cells = len;
            platform.x0 = cell_x as f32 * tuning.lane_width;
            platform.x1 = (cell_x + len) as f32 * tuning.lane_width;
        }
    }

    /// Discard platforms that scrolled past the top margin
    pub fn trim(&mut self, tuning: &Tuning) {
        let limit = -tuning.trim_margin;
        self.platforms.retain(|p| p.y > limit);
    }

    /// Generate until the deepest platform is `lookahead` past the bottom.
    /// Returns how many platforms were added.
    pub fn refill(
        &mut self,
        tuning: &Tuning,
        viewport: Viewport,
        progress: f32,
        rng: &mut GameRng,
    ) -> usize {
        let cells = cells_wide(tuning, viewport);
        let target = viewport.height + tuning.lookahead;
        let gap = difficulty::gap_range(tuning, progress);
        let gap_hi = gap.max.floor() as i32;
        let gap_lo = (gap.min.ceil() as i32).min(gap_hi);

        let mut bottom = self.bottom_y().unwrap_or(viewport.height * 0.5);
        let mut added = 0;
        while bottom < target {
            let prev_center = self
                .platforms
                .last()
                .map(Platform::center_x)
                .unwrap_or(viewport.width * 0.5);
            let prev_cell = (prev_center / tuning.lane_width).floor() as i32;

            let gap_cells = rng.range_i32(gap_lo, gap_hi);
            let y = bottom + gap_cells as f32 * tuning.step_height * GAP_CELL_FACTOR + tuning.step_height;

            let len = fit_len(rng.range_i32(tuning.min_len_cells, tuning.max_len_cells), cells);
            let drift = rng.range_i32(-tuning.drift_cells, tuning.drift_cells);
            let cell_x = clamp_cell(prev_cell + drift, len, cells);

            self.push(tuning, y, cell_x, len, rng);
            bottom = y;
            added += 1;
        }
        added
    }

    fn push(&mut self, tuning: &Tuning, y: f32, cell_x: i32, len: i32, rng: &mut GameRng) {
        let id = self.next_id;
        self.next_id += 1;
        self.platforms.push(Platform {
            id,
            y,
            x0: cell_x as f32 * tuning.lane_width,
            x1: (cell_x + len) as f32 * tuning.lane_width,
            cells: len,
            hue: (180.0 + rng.range_f32(0.0, 160.0)) % 360.0,
            phase: rng.range_f32(0.0, TAU),
        });
    }
}
