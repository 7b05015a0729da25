//! Error types for the non-simulation boundaries
//!
//! The simulation itself never fails. Everything that talks to the outside
//! world (leaderboard, storage, settings blobs) reports through these.

use thiserror::Error;

/// Rejection reasons for a display name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name is empty")]
    Empty,
}

/// Leaderboard request failures. None of these are fatal to gameplay.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LeaderboardError {
    /// Network unreachable, CORS, aborted request, ...
    #[error("network error: {0}")]
    Transport(String),
    /// Backend answered with a non-success status (auth, quota, ...)
    #[error("leaderboard rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// Response body was not the shape we expect
    #[error("malformed leaderboard response: {0}")]
    Malformed(String),
    #[error("invalid name: {0}")]
    InvalidName(#[from] NameError),
    #[error("a submission is already in flight")]
    SubmitInFlight,
    /// Only a finished run has a score to submit
    #[error("no finished run to submit")]
    NoFinishedRun,
}

/// Local key-value storage failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
}

/// Settings parsing/validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting: {0}")]
    Invalid(String),
}
