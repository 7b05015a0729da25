//! Best score and display name, persisted between sessions

use std::rc::Rc;

use super::store::KeyValueStore;
use crate::consts::{BEST_SCORE_KEY, PLAYER_NAME_KEY};
use crate::leaderboard::normalize_name;

/// Handle to the player's locally stored profile. Cheap to clone; clones share
/// the same store.
#[derive(Clone)]
pub struct Profile {
    store: Rc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile").finish_non_exhaustive()
    }
}

impl Profile {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored best score; 0 when absent or unparseable
    pub fn best_score(&self) -> u64 {
        self.store
            .get(BEST_SCORE_KEY)
            .and_then(|raw| parse_score(&raw))
            .unwrap_or(0)
    }

    pub fn save_best_score(&self, best: u64) {
        if let Err(e) = self.store.set(BEST_SCORE_KEY, &best.to_string()) {
            log::warn!("Could not save best score: {e}");
        }
    }

    /// Last-used display name, normalized. `None` if absent or blank.
    pub fn name(&self) -> Option<String> {
        let raw = self.store.get(PLAYER_NAME_KEY)?;
        normalize_name(&raw).ok()
    }

    pub fn save_name(&self, name: &str) {
        if let Err(e) = self.store.set(PLAYER_NAME_KEY, name) {
            log::warn!("Could not save player name: {e}");
        }
    }
}

/// Accepts integers and finite non-negative decimals (floored)
fn parse_score(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<u64>() {
        return Some(v);
    }
    let v = raw.parse::<f64>().ok()?;
    (v.is_finite() && v >= 0.0).then(|| v.floor() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn profile() -> (Rc<MemoryStore>, Profile) {
        let store = Rc::new(MemoryStore::new());
        let profile = Profile::new(store.clone());
        (store, profile)
    }

    #[test]
    fn test_best_defaults_to_zero() {
        let (store, profile) = profile();
        assert_eq!(profile.best_score(), 0);
        store.set(BEST_SCORE_KEY, "not a number").unwrap();
        assert_eq!(profile.best_score(), 0);
        store.set(BEST_SCORE_KEY, "-4").unwrap();
        assert_eq!(profile.best_score(), 0);
        store.set(BEST_SCORE_KEY, "NaN").unwrap();
        assert_eq!(profile.best_score(), 0);
    }

    #[test]
    fn test_best_roundtrip() {
        let (store, profile) = profile();
        profile.save_best_score(1234);
        assert_eq!(profile.best_score(), 1234);
        store.set(BEST_SCORE_KEY, "77.9").unwrap();
        assert_eq!(profile.best_score(), 77);
    }

    #[test]
    fn test_name_normalized_on_load() {
        let (store, profile) = profile();
        assert_eq!(profile.name(), None);
        store.set(PLAYER_NAME_KEY, "   ").unwrap();
        assert_eq!(profile.name(), None);
        store.set(PLAYER_NAME_KEY, "  neon   rider ").unwrap();
        assert_eq!(profile.name().as_deref(), Some("neon rider"));
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let (store, profile) = profile();
        profile.save_best_score(10);
        store.set_read_only(true);
        profile.save_best_score(20);
        profile.save_name("Alice");
        assert_eq!(profile.best_score(), 10);
        assert_eq!(profile.name(), None);
    }
}
