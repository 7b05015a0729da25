//! Difficulty curve
//!
//! Pure functions of elapsed run time. Progress only narrows the vertical gap
//! range; platform length is unaffected.

use crate::settings::{GapRange, Tuning};

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep on `[0, 1]`
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Normalized difficulty in `[0, 1]`, saturating at `ramp_duration`
pub fn progress(elapsed: f32, ramp_duration: f32) -> f32 {
    if ramp_duration <= 0.0 {
        return 1.0;
    }
    smoothstep(elapsed / ramp_duration)
}

/// Gap-cell bounds for a progress value. Exactly `gap_start` at 0 and
/// `gap_end` at 1.
pub fn gap_range(tuning: &Tuning, progress: f32) -> GapRange {
    let p = progress.clamp(0.0, 1.0);
    if p <= 0.0 {
        return tuning.gap_start;
    }
    if p >= 1.0 {
        return tuning.gap_end;
    }
    GapRange::new(
        lerp(tuning.gap_start.min, tuning.gap_end.min, p),
        lerp(tuning.gap_start.max, tuning.gap_end.max, p),
    )
}

/// Current descent rate
pub fn scroll_speed(tuning: &Tuning, elapsed: f32) -> f32 {
    (tuning.base_scroll + elapsed * tuning.scroll_accel).clamp(tuning.base_scroll, tuning.max_scroll)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_endpoints() {
        assert_eq!(progress(0.0, 60.0), 0.0);
        assert_eq!(progress(60.0, 60.0), 1.0);
        assert_eq!(progress(600.0, 60.0), 1.0);
        assert!((progress(30.0, 60.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_progress_monotonic() {
        let mut last = 0.0;
        for i in 0..=1000 {
            let p = progress(i as f32 * 0.1, 60.0);
            assert!(p >= last);
            assert!((0.0..=1.0).contains(&p));
            last = p;
        }
    }

    #[test]
    fn test_gap_range_endpoints_exact() {
        let tuning = Tuning::default();
        assert_eq!(gap_range(&tuning, 0.0), tuning.gap_start);
        assert_eq!(gap_range(&tuning, 1.0), tuning.gap_end);

        let mid = gap_range(&tuning, 0.5);
        assert!(mid.min <= tuning.gap_start.min && mid.min >= tuning.gap_end.min);
        assert!(mid.max <= tuning.gap_start.max && mid.max >= tuning.gap_end.max);
    }

    #[test]
    fn test_scroll_speed_clamped() {
        let tuning = Tuning::default();
        assert_eq!(scroll_speed(&tuning, 0.0), tuning.base_scroll);
        assert_eq!(scroll_speed(&tuning, 10.0), tuning.base_scroll + 280.0);
        assert_eq!(scroll_speed(&tuning, 1000.0), tuning.max_scroll);
    }
}
