//! In-process leaderboard for native runs and tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::{self, LocalBoxFuture};

use super::{LeaderboardBackend, LeaderboardEntry, sort_entries};
use crate::error::LeaderboardError;
use crate::platform::time::now_ms;

#[derive(Debug, Default)]
struct Table {
    rows: Vec<LeaderboardEntry>,
    last_timestamp: f64,
}

/// Leaderboard table kept in memory. Clones share the table.
#[derive(Debug, Clone, Default)]
pub struct MemoryLeaderboard {
    table: Rc<RefCell<Table>>,
    failure: Rc<RefCell<Option<LeaderboardError>>>,
    submit_calls: Rc<Cell<usize>>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with `failure` (None restores service)
    pub fn set_failure(&self, failure: Option<LeaderboardError>) {
        *self.failure.borrow_mut() = failure;
    }

    /// Insert a row directly, bypassing the failure switch
    pub fn insert(&self, name: &str, score: u64) {
        let mut table = self.table.borrow_mut();
        // Strictly increasing so insertion order breaks score ties
        let timestamp = now_ms().max(table.last_timestamp + 1.0);
        table.last_timestamp = timestamp;
        table.rows.push(LeaderboardEntry {
            name: name.to_string(),
            score,
            timestamp,
        });
    }

    pub fn len(&self) -> usize {
        self.table.borrow().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.borrow().rows.is_empty()
    }

    /// How many submits reached the backend (successful or not)
    pub fn submit_calls(&self) -> usize {
        self.submit_calls.get()
    }
}

impl LeaderboardBackend for MemoryLeaderboard {
    fn fetch_top(
        &self,
        limit: usize,
    ) -> LocalBoxFuture<'static, Result<Vec<LeaderboardEntry>, LeaderboardError>> {
        let result = match self.failure.borrow().clone() {
            Some(e) => Err(e),
            None => {
                let mut rows = self.table.borrow().rows.clone();
                sort_entries(&mut rows);
                rows.truncate(limit);
                Ok(rows)
            }
        };
        Box::pin(future::ready(result))
    }

    fn submit(&self, name: &str, score: u64) -> LocalBoxFuture<'static, Result<(), LeaderboardError>> {
        self.submit_calls.set(self.submit_calls.get() + 1);
        let result = match self.failure.borrow().clone() {
            Some(e) => Err(e),
            None => {
                self.insert(name, score);
                Ok(())
            }
        };
        Box::pin(future::ready(result))
    }
}
