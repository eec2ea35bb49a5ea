//! # vitalwatch
//!
//! A real-time TUI for monitoring a physiological digital twin and nudging
//! its recovery simulation.
//!
//! The dashboard polls a telemetry snapshot (the backend's `data.json`,
//! over HTTP or straight from disk), keeps bounded rolling windows per
//! vital sign, derives a categorical state and recovery view, and lets the
//! operator dispatch intervention commands with optimistic local feedback.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       Application                          │
//! │  ┌────────┐   ┌────────┐   ┌────────┐   ┌────┐   ┌──────┐ │
//! │  │ poller │──▶│ source │──▶│  data  │──▶│ ui │──▶│ Term │ │
//! │  │ (loop) │   │ (wire) │   │(derive)│   │    │   │      │ │
//! │  └────────┘   └────────┘   └────────┘   └────┘   └──────┘ │
//! │       ▲                         ▲                          │
//! │       │      ┌─────────┐        │                          │
//! │       └──────│   app   │────────┘                          │
//! │              │ (state) │◀── events (keyboard)              │
//! │              └────┬────┘                                   │
//! │                   ▼                                        │
//! │              ┌─────────┐                                   │
//! │              │ control │──▶ POST /api/...                  │
//! │              └─────────┘                                   │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`poller`]**: periodic acquisition with an at-most-one-in-flight
//!   guard and a stale-data fallback policy
//! - **[`source`]**: the [`SnapshotSource`] trait with HTTP and file
//!   implementations, plus the wire types
//! - **[`data`]**: bounded time-series storage, the state classifier, and
//!   the recovery tracker
//! - **[`control`]**: optimistic intervention levels and remote command
//!   dispatch
//! - **[`app`]** / **[`events`]** / **[`ui`]**: dashboard state, keyboard
//!   handling, and ratatui rendering
//!
//! ## Usage
//!
//! ```bash
//! # Poll the backend's snapshot endpoint
//! vitalwatch --url http://localhost:8000
//!
//! # Watch a data.json on disk (offline/demo mode)
//! vitalwatch --file web/data.json
//! ```

pub mod app;
pub mod control;
pub mod data;
pub mod events;
pub mod poller;
pub mod source;
pub mod ui;

pub use app::{App, View};
pub use control::{CommandClient, CommandError, InterventionCommand, InterventionController};
pub use data::{
    classify, PrimaryState, RecoveryView, Sample, SeverityTier, StateInfo, TimeSeriesStore,
};
pub use poller::{PollEvent, Poller};
pub use source::{FileSource, HttpSource, Snapshot, SnapshotSource, SourceError};
