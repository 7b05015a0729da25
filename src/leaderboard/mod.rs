//! Online leaderboard
//!
//! A remote table with two operations: submit a named score and fetch the
//! top N. Calls never block the frame loop; each one is a [`LeaderboardTask`]
//! the caller spawns, and results land in a shared [`LeaderboardView`] that
//! the UI only reads.

mod memory;

#[cfg(target_arch = "wasm32")]
mod http;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::NAME_MAX_CHARS;
use crate::error::{LeaderboardError, NameError};
use crate::persistence::Profile;

pub use memory::MemoryLeaderboard;

#[cfg(target_arch = "wasm32")]
pub use http::HttpLeaderboard;

/// A unit of leaderboard work, ready to be spawned
pub type LeaderboardTask = LocalBoxFuture<'static, ()>;

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    /// Unix timestamp (ms) of the submission
    pub timestamp: f64,
}

/// Trim, collapse internal whitespace, cap at [`NAME_MAX_CHARS`] characters.
/// Idempotent.
pub fn normalize_name(raw: &str) -> Result<String, NameError> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let capped: String = collapsed.chars().take(NAME_MAX_CHARS).collect();
    let name = capped.trim_end();
    if name.is_empty() {
        Err(NameError::Empty)
    } else {
        Ok(name.to_string())
    }
}

/// Highest score first, earliest submission breaks ties
pub fn sort_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.timestamp.total_cmp(&b.timestamp))
    });
}

/// Validate untyped backend rows. The payload must be an array; individual
/// rows that don't hold up are dropped, the rest are coerced.
pub fn parse_rows(payload: &Value) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
    let rows = payload
        .as_array()
        .ok_or_else(|| LeaderboardError::Malformed("expected an array of rows".into()))?;

    let mut entries: Vec<LeaderboardEntry> = rows
        .iter()
        .filter_map(|row| match parse_row(row) {
            Some(entry) => Some(entry),
            None => {
                log::warn!("Dropping malformed leaderboard row: {row}");
                None
            }
        })
        .collect();
    sort_entries(&mut entries);
    Ok(entries)
}

fn parse_row(row: &Value) -> Option<LeaderboardEntry> {
    let name = normalize_name(row.get("name")?.as_str()?).ok()?;

    let score = match row.get("score")? {
        Value::Number(n) => match n.as_u64() {
            Some(v) => v,
            None => {
                let v = n.as_f64()?;
                if !v.is_finite() || v < 0.0 {
                    return None;
                }
                v.floor() as u64
            }
        },
        _ => return None,
    };

    let timestamp = row
        .get("created_at")
        .or_else(|| row.get("timestamp"))
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => crate::platform::time::parse_timestamp(s),
            _ => None,
        })
        .filter(|t| t.is_finite())
        .unwrap_or(0.0);

    Some(LeaderboardEntry {
        name,
        score,
        timestamp,
    })
}

/// Remote table access. Futures must not borrow the backend.
pub trait LeaderboardBackend {
    fn fetch_top(
        &self,
        limit: usize,
    ) -> LocalBoxFuture<'static, Result<Vec<LeaderboardEntry>, LeaderboardError>>;

    /// `name` is already normalized
    fn submit(&self, name: &str, score: u64) -> LocalBoxFuture<'static, Result<(), LeaderboardError>>;
}

/// What the leaderboard panel shows. Written only by leaderboard tasks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardView {
    pub entries: Vec<LeaderboardEntry>,
    pub loading: bool,
    /// A submit is in flight; the submit button stays disabled
    pub submitting: bool,
    /// Last failure, human readable
    pub error: Option<String>,
    /// Name of the last successful submission
    pub submitted_as: Option<String>,
}

/// Issues leaderboard tasks and owns the display slot they write into
pub struct LeaderboardClient {
    backend: Rc<dyn LeaderboardBackend>,
    view: Rc<RefCell<LeaderboardView>>,
    profile: Profile,
    top_n: usize,
}

impl LeaderboardClient {
    pub fn new(backend: Rc<dyn LeaderboardBackend>, profile: Profile, top_n: usize) -> Self {
        Self {
            backend,
            view: Rc::new(RefCell::new(LeaderboardView::default())),
            profile,
            top_n: top_n.max(1),
        }
    }

    pub fn view(&self) -> Ref<'_, LeaderboardView> {
        self.view.borrow()
    }

    pub fn is_submitting(&self) -> bool {
        self.view.borrow().submitting
    }

    /// Fetch the top N into the view. A failure leaves an empty list and the
    /// error message.
    pub fn refresh(&self) -> LeaderboardTask {
        self.view.borrow_mut().loading = true;
        let fetch = self.backend.fetch_top(self.top_n);
        let view = self.view.clone();
        Box::pin(async move {
            let result = fetch.await;
            store_fetch(&view, result);
        })
    }

    /// Submit a score under `raw_name`. The name is normalized first; an empty
    /// name or an in-flight submit is rejected before any network call.
    /// On success the name is saved locally and the list refreshed.
    pub fn submit(&self, raw_name: &str, score: u64) -> Result<LeaderboardTask, LeaderboardError> {
        let name = match normalize_name(raw_name) {
            Ok(name) => name,
            Err(e) => {
                self.view.borrow_mut().error = Some("Enter a name first".to_string());
                return Err(e.into());
            }
        };
        {
            let mut view = self.view.borrow_mut();
            if view.submitting {
                return Err(LeaderboardError::SubmitInFlight);
            }
            view.submitting = true;
            view.error = None;
        }

        let submit = self.backend.submit(&name, score);
        let backend = self.backend.clone();
        let view = self.view.clone();
        let profile = self.profile.clone();
        let top_n = self.top_n;
        let task: LeaderboardTask = Box::pin(async move {
            match submit.await {
                Ok(()) => {
                    log::info!("Submitted {score} as {name}");
                    profile.save_name(&name);
                    {
                        let mut v = view.borrow_mut();
                        v.submitting = false;
                        v.submitted_as = Some(name);
                        v.loading = true;
                    }
                    let result = backend.fetch_top(top_n).await;
                    store_fetch(&view, result);
                }
                Err(e) => {
                    log::warn!("Leaderboard submit failed: {e}");
                    let mut v = view.borrow_mut();
                    v.submitting = false;
                    v.error = Some(e.to_string());
                }
            }
        });
        Ok(task)
    }
}

fn store_fetch(
    view: &RefCell<LeaderboardView>,
    result: Result<Vec<LeaderboardEntry>, LeaderboardError>,
) {
    let mut v = view.borrow_mut();
    v.loading = false;
    match result {
        Ok(entries) => {
            v.entries = entries;
            v.error = None;
        }
        Err(e) => {
            log::warn!("Leaderboard fetch failed: {e}");
            v.entries.clear();
            v.error = Some(e.to_string());
        }
    }
}
