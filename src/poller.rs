//! Periodic snapshot acquisition with an at-most-one-in-flight guard.
//!
//! Ticks arrive from the main loop's timer; each tick either starts one
//! background fetch or is skipped entirely because the previous fetch is
//! still outstanding. Skipping (rather than queueing) keeps snapshot
//! application strictly sequential even when network latency exceeds the
//! poll interval.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::source::{Snapshot, SnapshotSource, SourceError};

/// What a completed poll cycle means for the display.
#[derive(Debug)]
pub enum PollEvent {
    /// A snapshot arrived; fold it into the dashboard.
    Snapshot(Snapshot),
    /// A fetch failed before any fetch ever succeeded; show a placeholder.
    Placeholder(String),
    /// A fetch failed after an earlier success; keep the stale display and
    /// surface this as a diagnostic only.
    Degraded(String),
}

/// Drives snapshot acquisition against a [`SnapshotSource`].
#[derive(Debug)]
pub struct Poller {
    source: Arc<dyn SnapshotSource>,
    tx: mpsc::UnboundedSender<(u64, Result<Snapshot, SourceError>)>,
    rx: mpsc::UnboundedReceiver<(u64, Result<Snapshot, SourceError>)>,
    /// Bumped by `stop()`; completions from an older generation are discarded.
    generation: u64,
    in_flight: bool,
    running: bool,
    had_success: bool,
    last_checked: Option<Instant>,
    last_success: Option<Instant>,
}

impl Poller {
    /// Create a poller in the running state. Must be called inside a tokio
    /// runtime (fetches are spawned as background tasks).
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            tx,
            rx,
            generation: 0,
            in_flight: false,
            running: true,
            had_success: false,
            last_checked: None,
            last_success: None,
        }
    }

    /// Start one fetch, unless stopped or one is already outstanding.
    ///
    /// Returns whether a fetch was actually started.
    pub fn tick(&mut self) -> bool {
        if !self.running || self.in_flight {
            return false;
        }
        self.in_flight = true;

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = source.fetch().await;
            let _ = tx.send((generation, result));
        });
        true
    }

    /// Collect completed fetches and translate them per the fallback policy.
    pub fn drain(&mut self) -> Vec<PollEvent> {
        let mut events = Vec::new();
        while let Ok((generation, result)) = self.rx.try_recv() {
            self.in_flight = false;
            if generation != self.generation {
                // Completed after stop(); discard rather than apply.
                debug!("discarding poll result from stopped cycle");
                continue;
            }
            self.last_checked = Some(Instant::now());
            match result {
                Ok(snapshot) => {
                    self.had_success = true;
                    self.last_success = Some(Instant::now());
                    events.push(PollEvent::Snapshot(snapshot));
                }
                Err(err) if !self.had_success => {
                    events.push(PollEvent::Placeholder(format!(
                        "Waiting for telemetry ({})",
                        err
                    )));
                }
                Err(err) => {
                    warn!(error = %err, "poll failed, keeping last good data");
                    events.push(PollEvent::Degraded(err.to_string()));
                }
            }
        }
        events
    }

    /// Halt polling. No further ticks start fetches; a fetch already in
    /// flight completes but its result is discarded, not applied.
    pub fn stop(&mut self) {
        self.running = false;
        self.generation += 1;
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn had_success(&self) -> bool {
        self.had_success
    }

    /// When any fetch last completed, success or not.
    pub fn last_checked(&self) -> Option<Instant> {
        self.last_checked
    }

    pub fn last_success(&self) -> Option<Instant> {
        self.last_success
    }

    pub fn source_description(&self) -> &str {
        self.source.description()
    }
}
