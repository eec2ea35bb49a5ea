//! Recovery simulation tracking: severity tiers, progress, and ETA.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::source::RawRecoveryStatus;

/// Intervention types the backend simulates, in display order.
///
/// The server may report others; they are appended after these.
pub const INTERVENTION_CATALOG: &[&str] = &[
    "hydration",
    "electrolytes",
    "nutrients",
    "rest",
    "exercise",
    "medication",
];

/// Default severity when the operator starts a simulation without picking one.
pub const DEFAULT_SEVERITY: f64 = 0.7;

/// Severity bucket derived from the raw [0,1] severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeverityTier {
    Mild,
    Moderate,
    Severe,
}

impl SeverityTier {
    /// Half-open intervals; 0.3 and 0.7 belong to the higher tier.
    pub fn from_severity(severity: f64) -> Self {
        if severity >= 0.7 {
            SeverityTier::Severe
        } else if severity >= 0.3 {
            SeverityTier::Moderate
        } else {
            SeverityTier::Mild
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeverityTier::Mild => "Mild",
            SeverityTier::Moderate => "Moderate",
            SeverityTier::Severe => "Severe",
        }
    }
}

/// Renderer-facing view of the recovery section.
///
/// When `visible` is false no other field carries meaning and the recovery
/// panel is hidden.
#[derive(Debug, Clone)]
pub struct RecoveryView {
    pub visible: bool,
    pub severity: f64,
    pub tier: SeverityTier,
    pub progress_percent: u32,
    pub elapsed: Duration,
    /// Naive constant-rate projection; absent while progress is still 0%
    /// (the extrapolation would divide by zero).
    pub remaining: Option<Duration>,
    pub interventions: BTreeMap<String, f64>,
}

impl Default for RecoveryView {
    fn default() -> Self {
        Self {
            visible: false,
            severity: 0.0,
            tier: SeverityTier::Mild,
            progress_percent: 0,
            elapsed: Duration::ZERO,
            remaining: None,
            interventions: BTreeMap::new(),
        }
    }
}

/// Derive the recovery view from the raw `recovery_status` section.
///
/// Out-of-range severity, progress, and intervention levels are clamped to
/// [0,1] rather than rejected.
pub fn update(raw: Option<&RawRecoveryStatus>) -> RecoveryView {
    let Some(raw) = raw.filter(|r| r.active) else {
        return RecoveryView::default();
    };

    let severity = raw.severity.clamp(0.0, 1.0);
    let progress = raw.recovery_progress.clamp(0.0, 1.0);
    let progress_percent = (progress * 100.0).round() as u32;
    let elapsed_secs = raw.elapsed_time.max(0.0);

    // Values beyond Duration's range (absurd but decodable) collapse to
    // "no estimate" rather than a conversion panic.
    let remaining = if progress_percent > 0 {
        let total_estimated = elapsed_secs / (progress_percent as f64 / 100.0);
        Duration::try_from_secs_f64((total_estimated - elapsed_secs).max(0.0)).ok()
    } else {
        None
    };

    let interventions = raw
        .interventions
        .iter()
        .map(|(name, level)| (name.clone(), level.clamp(0.0, 1.0)))
        .collect();

    RecoveryView {
        visible: true,
        severity,
        tier: SeverityTier::from_severity(severity),
        progress_percent,
        elapsed: Duration::try_from_secs_f64(elapsed_secs).unwrap_or(Duration::MAX),
        remaining,
        interventions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::duration::split_hours_minutes;

    fn raw_active(severity: f64, progress: f64, elapsed: f64) -> RawRecoveryStatus {
        RawRecoveryStatus {
            active: true,
            severity,
            recovery_progress: progress,
            interventions: BTreeMap::new(),
            elapsed_time: elapsed,
        }
    }

    #[test]
    fn test_inactive_or_absent_hides_panel() {
        assert!(!update(None).visible);

        let mut raw = raw_active(0.5, 0.5, 100.0);
        raw.active = false;
        assert!(!update(Some(&raw)).visible);
    }

    #[test]
    fn test_severity_tier_partition() {
        let cases = [
            (0.0, SeverityTier::Mild),
            (0.29, SeverityTier::Mild),
            (0.3, SeverityTier::Moderate),
            (0.69, SeverityTier::Moderate),
            (0.7, SeverityTier::Severe),
            (1.0, SeverityTier::Severe),
        ];
        for (severity, expected) in cases {
            assert_eq!(SeverityTier::from_severity(severity), expected, "severity {}", severity);
        }
    }

    #[test]
    fn test_progress_percent_rounds() {
        assert_eq!(update(Some(&raw_active(0.5, 0.4, 0.0))).progress_percent, 40);
        assert_eq!(update(Some(&raw_active(0.5, 0.456, 0.0))).progress_percent, 46);
    }

    #[test]
    fn test_no_eta_at_zero_progress() {
        let view = update(Some(&raw_active(0.5, 0.0, 600.0)));
        assert!(view.visible);
        assert!(view.remaining.is_none());
    }

    #[test]
    fn test_eta_linear_extrapolation() {
        // 600s elapsed at 40% -> 1500s total, 900s remaining -> 0h 15m
        let view = update(Some(&raw_active(0.5, 0.4, 600.0)));
        let remaining = view.remaining.unwrap();
        assert_eq!(remaining.as_secs(), 900);
        assert_eq!(split_hours_minutes(remaining), (0, 15));
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let mut raw = raw_active(1.7, -0.2, 60.0);
        raw.interventions.insert("hydration".to_string(), 2.5);
        raw.interventions.insert("rest".to_string(), -1.0);

        let view = update(Some(&raw));
        assert_eq!(view.severity, 1.0);
        assert_eq!(view.progress_percent, 0);
        assert_eq!(view.interventions["hydration"], 1.0);
        assert_eq!(view.interventions["rest"], 0.0);
    }

    #[test]
    fn test_huge_elapsed_time_does_not_panic() {
        // elapsed_time beyond Duration's f64 range must not abort the
        // process; the elapsed clock saturates instead.
        let view = update(Some(&raw_active(0.5, 0.0, 1e20)));
        assert!(view.visible);
        assert_eq!(view.elapsed, Duration::MAX);
        assert!(view.remaining.is_none());
    }

    #[test]
    fn test_eta_overflow_yields_no_estimate() {
        // 1e18s at 1% extrapolates to ~1e20s total, past Duration's range;
        // the estimate is withheld rather than panicking on conversion.
        let view = update(Some(&raw_active(0.5, 0.01, 1e18)));
        assert!(view.visible);
        assert!(view.remaining.is_none());
    }

    #[test]
    fn test_elapsed_decomposition() {
        let view = update(Some(&raw_active(0.5, 0.5, 7325.0)));
        assert_eq!(split_hours_minutes(view.elapsed), (2, 2));
    }
}
