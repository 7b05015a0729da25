//! Frame timing and wall-clock helpers

use crate::consts::MAX_FRAME_DT;

/// Turns frame-callback timestamps into clamped simulation steps. After a
/// stall the game loses real time instead of taking one huge step.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call, clamped to `[0, MAX_FRAME_DT]`.
    /// The first call returns 0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        }
    }

    /// Forget the previous timestamp (e.g. after the tab was hidden)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Wall-clock time in ms since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Parse a backend timestamp string into ms since the epoch
#[cfg(target_arch = "wasm32")]
pub fn parse_timestamp(raw: &str) -> Option<f64> {
    let ms = js_sys::Date::parse(raw);
    (!ms.is_nan()).then_some(ms)
}

/// Native builds only understand numeric strings
#[cfg(not(target_arch = "wasm32"))]
pub fn parse_timestamp(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1000.0), 0.0);
        assert!((clock.advance(1016.0) - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        assert_eq!(clock.advance(5000.0), MAX_FRAME_DT);
        // Clock going backwards never yields a negative step
        assert_eq!(clock.advance(4000.0), 0.0);
        assert_eq!(clock.advance(f64::NAN), 0.0);
    }

    #[test]
    fn test_reset_forgets_last_frame() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        clock.reset();
        assert_eq!(clock.advance(10_000.0), 0.0);
    }

    #[test]
    fn test_parse_numeric_timestamp() {
        assert_eq!(parse_timestamp(" 1700000000000 "), Some(1_700_000_000_000.0));
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
