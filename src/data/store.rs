//! Bounded rolling time-series storage.
//!
//! The backend always sends a full recent window per metric, never a delta,
//! so series are replaced wholesale rather than appended to.

use std::collections::BTreeMap;

/// Default window size per metric.
pub const DEFAULT_MAX_POINTS: usize = 50;

/// A single (timestamp, value) reading. Timestamps are epoch seconds;
/// conversion to display units happens only at the UI boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub ts_secs: f64,
    pub value: f64,
}

impl Sample {
    pub fn new(ts_secs: f64, value: f64) -> Self {
        Self { ts_secs, value }
    }
}

/// Per-metric bounded buffers of samples.
///
/// This is the only state retained across poll cycles (besides the
/// controller's optimistic intervention levels).
#[derive(Debug, Clone)]
pub struct TimeSeriesStore {
    series: BTreeMap<String, Vec<Sample>>,
    max_points: usize,
}

impl Default for TimeSeriesStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POINTS)
    }
}

impl TimeSeriesStore {
    pub fn new(max_points: usize) -> Self {
        Self {
            series: BTreeMap::new(),
            max_points: max_points.max(1),
        }
    }

    /// Replace the stored window for a metric with the suffix of `points`.
    ///
    /// At most `max_points` samples survive; when `points` is longer, the
    /// oldest entries are dropped, preserving the original order of the rest.
    pub fn replace(&mut self, metric: &str, mut points: Vec<Sample>) {
        let excess = points.len().saturating_sub(self.max_points);
        if excess > 0 {
            points.drain(..excess);
        }
        self.series.insert(metric.to_string(), points);
    }

    /// The current window for a metric, empty if never populated.
    pub fn series(&self, metric: &str) -> &[Sample] {
        self.series.get(metric).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }
}
