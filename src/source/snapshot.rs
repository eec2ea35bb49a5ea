//! Wire types for the telemetry snapshot and their normalized form.
//!
//! The raw types mirror the JSON the backend serves verbatim. Normalization
//! into [`Snapshot`] coerces points into [`Sample`]s and drops anything
//! non-finite; classification and recovery derivation stay in the `data`
//! layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::data::Sample;

/// Metrics the dashboard charts, in display order.
///
/// `hrv` is intentionally absent: it only ever appears in
/// `physiological_values`, never as a series.
pub const CHARTED_METRICS: &[&str] = &[
    "heart_rate",
    "systolic_pressure",
    "diastolic_pressure",
    "mean_pressure",
    "oxygen_saturation",
    "respiratory_rate",
    "cardiac_output",
    "recovery_progress",
];

/// The top-level snapshot as served by the backend.
///
/// Every field may be absent; an absent section simply means "not present",
/// never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub values: BTreeMap<String, Vec<RawPoint>>,
    #[serde(default)]
    pub latest_record: Option<RawLatestRecord>,
    #[serde(default)]
    pub current_state: Option<RawState>,
    #[serde(default)]
    pub recovery_status: Option<RawRecoveryStatus>,
}

/// One chart point: `x` is epoch seconds, `y` the metric value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawPoint {
    pub x: f64,
    pub y: f64,
}

/// One instantaneous reading, distinct from the historical series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLatestRecord {
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub physiological_values: BTreeMap<String, f64>,
}

/// The backend emits either epoch seconds or an ISO-8601 string here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Seconds(f64),
    Text(String),
}

/// Raw `current_state` section.
///
/// The description has shipped under two different keys across backend
/// versions; both are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawState {
    #[serde(default)]
    pub primary_state: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub state_description: Option<String>,
}

/// Raw `recovery_status` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecoveryStatus {
    // The backend's JSON encoder turns booleans into 0/1, so accept both.
    #[serde(default, deserialize_with = "truthy")]
    pub active: bool,
    #[serde(default)]
    pub severity: f64,
    #[serde(default)]
    pub recovery_progress: f64,
    #[serde(default)]
    pub interventions: BTreeMap<String, f64>,
    #[serde(default)]
    pub elapsed_time: f64,
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Truthy {
        Bool(bool),
        Number(f64),
    }

    Ok(match Truthy::deserialize(deserializer)? {
        Truthy::Bool(b) => b,
        Truthy::Number(n) => n != 0.0,
    })
}

/// The normalized ingest unit, rebuilt on every successful poll and
/// discarded once folded into the dashboard's state.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub series: BTreeMap<String, Vec<Sample>>,
    pub latest: Option<RawLatestRecord>,
    pub state: Option<RawState>,
    pub recovery: Option<RawRecoveryStatus>,
}

impl Snapshot {
    /// Coerce a raw snapshot point-by-point into the internal model.
    ///
    /// Timestamps stay in epoch seconds; non-finite coordinates are dropped.
    pub fn from_raw(raw: RawSnapshot) -> Self {
        let series = raw
            .values
            .into_iter()
            .map(|(metric, points)| {
                let samples = points
                    .into_iter()
                    .filter(|p| p.x.is_finite() && p.y.is_finite())
                    .map(|p| Sample::new(p.x, p.y))
                    .collect();
                (metric, samples)
            })
            .collect();

        Self {
            series,
            latest: raw.latest_record,
            state: raw.current_state,
            recovery: raw.recovery_status,
        }
    }

    /// A snapshot with no series is a non-update: it must not blank
    /// previously rendered charts, only advance the last-check clock.
    pub fn is_update(&self) -> bool {
        !self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_snapshot() {
        let json = r#"{
            "values": {
                "heart_rate": [ {"x": 1700000000.0, "y": 72.5}, {"x": 1700000001.0, "y": 73.0} ],
                "oxygen_saturation": [ {"x": 1700000000.0, "y": 98.2} ]
            },
            "latest_record": {
                "timestamp": "2026-08-30T12:00:00",
                "physiological_values": { "heart_rate": 73.0, "hrv": 48.1 }
            },
            "current_state": { "primary_state": "is_chill", "state_description": "Twin is chill" },
            "recovery_status": {
                "active": 1,
                "severity": 0.7,
                "recovery_progress": 0.25,
                "interventions": { "hydration": 0.5 },
                "elapsed_time": 1200.0
            }
        }"#;

        let raw: RawSnapshot = serde_json::from_str(json).unwrap();
        let snapshot = Snapshot::from_raw(raw);

        assert!(snapshot.is_update());
        assert_eq!(snapshot.series["heart_rate"].len(), 2);
        assert_eq!(snapshot.series["heart_rate"][1].value, 73.0);

        let latest = snapshot.latest.unwrap();
        assert_eq!(latest.physiological_values["hrv"], 48.1);
        assert!(matches!(latest.timestamp, Some(Timestamp::Text(_))));

        let recovery = snapshot.recovery.unwrap();
        assert!(recovery.active);
        assert_eq!(recovery.interventions["hydration"], 0.5);
    }

    #[test]
    fn test_all_sections_optional() {
        let raw: RawSnapshot = serde_json::from_str("{}").unwrap();
        let snapshot = Snapshot::from_raw(raw);
        assert!(!snapshot.is_update());
        assert!(snapshot.latest.is_none());
        assert!(snapshot.state.is_none());
        assert!(snapshot.recovery.is_none());
    }

    #[test]
    fn test_numeric_timestamp_accepted() {
        let json = r#"{ "latest_record": { "timestamp": 1700000000.5 } }"#;
        let raw: RawSnapshot = serde_json::from_str(json).unwrap();
        let latest = raw.latest_record.unwrap();
        assert!(matches!(latest.timestamp, Some(Timestamp::Seconds(t)) if t == 1700000000.5));
    }

    #[test]
    fn test_boolean_active_accepted() {
        let json = r#"{ "recovery_status": { "active": true } }"#;
        let raw: RawSnapshot = serde_json::from_str(json).unwrap();
        assert!(raw.recovery_status.unwrap().active);

        let json = r#"{ "recovery_status": { "active": 0 } }"#;
        let raw: RawSnapshot = serde_json::from_str(json).unwrap();
        assert!(!raw.recovery_status.unwrap().active);
    }

    #[test]
    fn test_non_finite_points_dropped() {
        let mut raw = RawSnapshot::default();
        raw.values.insert(
            "heart_rate".to_string(),
            vec![
                RawPoint { x: 1.0, y: f64::NAN },
                RawPoint { x: 2.0, y: 70.0 },
            ],
        );
        let snapshot = Snapshot::from_raw(raw);
        assert_eq!(snapshot.series["heart_rate"].len(), 1);
        assert_eq!(snapshot.series["heart_rate"][0].ts_secs, 2.0);
    }
}
