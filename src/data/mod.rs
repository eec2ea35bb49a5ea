//! Data models and derivation for vitals snapshots.
//!
//! This layer turns normalized snapshots into renderer-facing views:
//!
//! - [`store`]: bounded rolling windows of samples per metric
//! - [`state`]: the categorical primary-state classifier
//! - [`recovery`]: severity tiers, progress, and remaining-time estimates
//! - [`duration`]: hours/minutes decomposition and clock formatting

pub mod duration;
pub mod recovery;
pub mod state;
pub mod store;

pub use recovery::{RecoveryView, SeverityTier, DEFAULT_SEVERITY, INTERVENTION_CATALOG};
pub use state::{classify, PrimaryState, StateInfo};
pub use store::{Sample, TimeSeriesStore, DEFAULT_MAX_POINTS};
