//! Seeded random draws for platform generation

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Thin wrapper over PCG32 with the handful of draws the generator needs
#[derive(Debug, Clone)]
pub struct GameRng {
    inner: Pcg32,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Uniform float in `[lo, hi)`; returns `lo` for an empty range
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.inner.random_range(lo..hi)
    }

    /// Uniform integer in `[lo, hi]`; returns `lo` when `hi < lo`
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.inner.random_range(lo..=hi)
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.random_bool(p.clamp(0.0, 1.0))
    }

    /// -1 or 1 with equal odds
    pub fn sign(&mut self) -> i32 {
        if self.chance(0.5) { 1 } else { -1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_stay_inclusive() {
        let mut rng = GameRng::new(7);
        for _ in 0..1000 {
            let v = rng.range_i32(2, 6);
            assert!((2..=6).contains(&v));
            let f = rng.range_f32(-1.0, 1.0);
            assert!((-1.0..1.0).contains(&f));
        }
    }

    #[test]
    fn test_degenerate_ranges() {
        let mut rng = GameRng::new(7);
        assert_eq!(rng.range_i32(5, 5), 5);
        assert_eq!(rng.range_i32(5, 1), 5);
        assert_eq!(rng.range_f32(3.0, 3.0), 3.0);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = GameRng::new(99);
        let mut b = GameRng::new(99);
        for _ in 0..32 {
            assert_eq!(a.range_i32(0, 1000), b.range_i32(0, 1000));
        }
    }
}
