//! Snapshot acquisition from various backends.
//!
//! The [`SnapshotSource`] trait abstracts where snapshots come from: the
//! backend's HTTP endpoint in normal operation, or a `data.json` on disk for
//! offline and demo use. The poller drives whichever source it is given.

mod file;
mod http;
mod snapshot;

pub use file::FileSource;
pub use http::HttpSource;
pub use snapshot::{
    RawLatestRecord, RawPoint, RawRecoveryStatus, RawSnapshot, RawState, Snapshot, Timestamp,
    CHARTED_METRICS,
};

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

/// Why a snapshot fetch failed.
///
/// None of these are fatal; the poller converts them into its display
/// fallback policy.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request could not complete at all.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered outside the 2xx range.
    #[error("server returned status {0}")]
    Status(u16),

    /// The body was not a decodable snapshot.
    #[error("malformed snapshot: {0}")]
    Parse(String),

    /// The transport signalled a timeout; treated like any other failure.
    #[error("request timed out")]
    Timeout,

    /// Local read failure (file source).
    #[error("read error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}

/// A backend that can produce one normalized snapshot per fetch.
#[async_trait]
pub trait SnapshotSource: Send + Sync + Debug {
    /// Acquire and normalize the current snapshot.
    async fn fetch(&self) -> Result<Snapshot, SourceError>;

    /// Human-readable description for the status bar.
    fn description(&self) -> &str;
}
