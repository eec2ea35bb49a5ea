//! Application state and orchestration.
//!
//! [`App`] is the dashboard: it owns the time-series store, the derived
//! state/recovery views, and the intervention controller, and folds poll
//! results into them. It is constructed once per session and holds no
//! global state.

use std::time::Instant;

use crate::control::{CommandError, InterventionCommand, InterventionController};
use crate::data::{
    classify, recovery, RecoveryView, StateInfo, TimeSeriesStore, DEFAULT_SEVERITY,
    INTERVENTION_CATALOG,
};
use crate::poller::PollEvent;
use crate::source::CHARTED_METRICS;
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Charts and current values for all vitals.
    Vitals,
    /// Recovery simulation panel with intervention sliders.
    Recovery,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Vitals => View::Recovery,
            View::Recovery => View::Vitals,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Vitals => "Vitals",
            View::Recovery => "Recovery",
        }
    }
}

/// Step applied to the selected slider per keypress.
pub const LEVEL_STEP: f64 = 0.05;

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Ingested data
    pub store: TimeSeriesStore,
    pub state: StateInfo,
    pub recovery: RecoveryView,
    pub latest: Option<crate::source::RawLatestRecord>,

    // Failure surface
    pub load_error: Option<String>,
    pub degraded: Option<String>,
    pub last_checked: Option<Instant>,
    pub last_success: Option<Instant>,

    // Intervention control
    pub controller: InterventionController,
    pub selected_intervention: usize,
    /// Live slider preview; local only until committed with Enter.
    pub preview_level: Option<f64>,

    // Navigation
    pub selected_metric: usize,

    // UI
    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
    source_description: String,
    refresh_requested: bool,
}

impl App {
    pub fn new(
        controller: InterventionController,
        max_points: usize,
        source_description: String,
    ) -> Self {
        Self {
            running: true,
            current_view: View::Vitals,
            show_help: false,
            store: TimeSeriesStore::new(max_points),
            state: StateInfo::unknown(),
            recovery: RecoveryView::default(),
            latest: None,
            load_error: None,
            degraded: None,
            last_checked: None,
            last_success: None,
            controller,
            selected_intervention: 0,
            preview_level: None,
            selected_metric: 0,
            theme: Theme::auto_detect(),
            status_message: None,
            source_description,
            refresh_requested: false,
        }
    }

    pub fn source_description(&self) -> &str {
        &self.source_description
    }

    /// Fold one poll outcome into the dashboard per the fallback policy.
    pub fn apply_poll_event(&mut self, event: PollEvent) {
        match event {
            PollEvent::Snapshot(snapshot) => {
                self.last_checked = Some(Instant::now());
                if !snapshot.is_update() {
                    // Non-update: keep the stale charts, only the
                    // last-check clock advances.
                    return;
                }

                for (metric, samples) in snapshot.series {
                    self.store.replace(&metric, samples);
                }
                self.state = classify(snapshot.state.as_ref());
                self.recovery = recovery::update(snapshot.recovery.as_ref());
                self.controller.reconcile(&self.recovery.interventions);
                self.latest = snapshot.latest;
                self.load_error = None;
                self.degraded = None;
                self.last_success = Some(Instant::now());
                self.clamp_selections();
            }
            PollEvent::Placeholder(message) => {
                self.last_checked = Some(Instant::now());
                self.load_error = Some(message);
            }
            PollEvent::Degraded(message) => {
                self.last_checked = Some(Instant::now());
                self.degraded = Some(message);
            }
        }
    }

    /// React to a finished command dispatch.
    ///
    /// Recovery commands toggle panel visibility on success; level commands
    /// carry no further state either way (no rollback on failure).
    pub fn apply_command_result(
        &mut self,
        cmd: InterventionCommand,
        result: Result<(), CommandError>,
    ) {
        match (&cmd, &result) {
            (InterventionCommand::StartRecovery { severity }, Ok(())) => {
                self.recovery.visible = true;
                self.recovery.severity = *severity;
                self.recovery.tier = crate::data::SeverityTier::from_severity(*severity);
                self.set_status_message("Recovery simulation started".to_string());
            }
            (InterventionCommand::StopRecovery, Ok(())) => {
                self.recovery = RecoveryView::default();
                self.set_status_message("Recovery simulation stopped".to_string());
            }
            (InterventionCommand::SetLevel { kind, level }, Ok(())) => {
                self.set_status_message(format!("{} set to {:.0}%", kind, level * 100.0));
            }
            (_, Err(err)) => {
                self.set_status_message(format!("Command failed: {}", err));
            }
        }
    }

    // ----- metrics -----

    /// Metric names the vitals view cycles through.
    pub fn metric_names(&self) -> &'static [&'static str] {
        CHARTED_METRICS
    }

    pub fn selected_metric_name(&self) -> &'static str {
        CHARTED_METRICS[self.selected_metric.min(CHARTED_METRICS.len() - 1)]
    }

    /// The instantaneous value for a metric, from the latest record.
    ///
    /// May reflect a slightly newer sample than the last series point.
    pub fn current_value(&self, metric: &str) -> Option<f64> {
        self.latest
            .as_ref()
            .and_then(|r| r.physiological_values.get(metric))
            .copied()
    }

    // ----- interventions -----

    /// Interventions in display order: the known catalog first, then any
    /// extra names the server reports.
    pub fn intervention_names(&self) -> Vec<String> {
        let mut names: Vec<String> = INTERVENTION_CATALOG.iter().map(|s| s.to_string()).collect();
        for name in self.recovery.interventions.keys().chain(self.controller.levels().keys()) {
            if !names.iter().any(|n| n == name) {
                names.push(name.clone());
            }
        }
        names
    }

    pub fn selected_intervention_name(&self) -> Option<String> {
        self.intervention_names().get(self.selected_intervention).cloned()
    }

    /// The level shown for an intervention: the optimistic view when one
    /// exists, else the last server-reported level.
    pub fn displayed_level(&self, name: &str) -> f64 {
        self.controller
            .level(name)
            .or_else(|| self.recovery.interventions.get(name).copied())
            .unwrap_or(0.0)
    }

    /// Nudge the live preview for the selected slider. Local only; no
    /// network traffic until the preview is committed.
    pub fn adjust_preview(&mut self, delta: f64) {
        let Some(name) = self.selected_intervention_name() else {
            return;
        };
        let base = self.preview_level.unwrap_or_else(|| self.displayed_level(&name));
        self.preview_level = Some((base + delta).clamp(0.0, 1.0));
    }

    /// Commit the preview as an intervention command.
    pub fn commit_preview(&mut self) {
        let Some(level) = self.preview_level.take() else {
            return;
        };
        let Some(name) = self.selected_intervention_name() else {
            return;
        };
        self.controller.set_level(&name, level);
    }

    pub fn cancel_preview(&mut self) {
        self.preview_level = None;
    }

    pub fn start_recovery(&mut self) {
        self.controller.start_recovery(DEFAULT_SEVERITY);
    }

    pub fn stop_recovery(&mut self) {
        self.controller.stop_recovery();
    }

    // ----- navigation -----

    pub fn next_view(&mut self) {
        self.preview_level = None;
        self.current_view = self.current_view.next();
    }

    pub fn set_view(&mut self, view: View) {
        if self.current_view != view {
            self.preview_level = None;
        }
        self.current_view = view;
    }

    pub fn select_next(&mut self) {
        match self.current_view {
            View::Vitals => {
                let max = CHARTED_METRICS.len() - 1;
                self.selected_metric = (self.selected_metric + 1).min(max);
            }
            View::Recovery => {
                let max = self.intervention_names().len().saturating_sub(1);
                if self.selected_intervention < max {
                    self.selected_intervention += 1;
                    self.preview_level = None;
                }
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.current_view {
            View::Vitals => {
                self.selected_metric = self.selected_metric.saturating_sub(1);
            }
            View::Recovery => {
                if self.selected_intervention > 0 {
                    self.selected_intervention -= 1;
                    self.preview_level = None;
                }
            }
        }
    }

    fn clamp_selections(&mut self) {
        let count = self.intervention_names().len();
        if self.selected_intervention >= count {
            self.selected_intervention = count.saturating_sub(1);
        }
    }

    // ----- misc -----

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::CommandClient;
    use crate::data::Sample;
    use crate::source::{RawSnapshot, Snapshot};
    use std::collections::BTreeMap;

    fn test_app() -> App {
        let controller = InterventionController::new(CommandClient::new("http://localhost:0"));
        App::new(controller, 50, "test".to_string())
    }

    fn snapshot_with_series(metric: &str, n: usize) -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.series.insert(
            metric.to_string(),
            (0..n).map(|i| Sample::new(i as f64, 60.0)).collect(),
        );
        snapshot
    }

    #[tokio::test]
    async fn test_snapshot_folds_into_store() {
        let mut app = test_app();
        app.apply_poll_event(PollEvent::Snapshot(snapshot_with_series("heart_rate", 60)));

        assert_eq!(app.store.series("heart_rate").len(), 50);
        assert!(app.last_success.is_some());
        assert!(app.load_error.is_none());
    }

    #[tokio::test]
    async fn test_non_update_keeps_previous_series() {
        let mut app = test_app();
        app.apply_poll_event(PollEvent::Snapshot(snapshot_with_series("heart_rate", 10)));
        let before = app.store.series("heart_rate").to_vec();

        // Empty snapshot: stale data preferred over blanking
        app.apply_poll_event(PollEvent::Snapshot(Snapshot::default()));
        assert_eq!(app.store.series("heart_rate"), before.as_slice());
        assert!(app.last_checked.is_some());
    }

    #[tokio::test]
    async fn test_placeholder_then_degraded_policy() {
        let mut app = test_app();

        app.apply_poll_event(PollEvent::Placeholder("no data yet".to_string()));
        assert!(app.load_error.is_some());

        app.apply_poll_event(PollEvent::Snapshot(snapshot_with_series("heart_rate", 5)));
        assert!(app.load_error.is_none());
        let before = app.store.series("heart_rate").to_vec();

        // A later failure keeps the rendered data untouched
        app.apply_poll_event(PollEvent::Degraded("connection refused".to_string()));
        assert_eq!(app.store.series("heart_rate"), before.as_slice());
        assert!(app.load_error.is_none());
        assert!(app.degraded.is_some());
    }

    #[tokio::test]
    async fn test_snapshot_reconciles_optimistic_levels() {
        let mut app = test_app();
        app.controller.set_level("hydration", 0.9);

        let mut snapshot = snapshot_with_series("heart_rate", 1);
        let mut interventions = BTreeMap::new();
        interventions.insert("hydration".to_string(), 0.3);
        snapshot.recovery = Some(crate::source::RawRecoveryStatus {
            active: true,
            severity: 0.5,
            recovery_progress: 0.1,
            interventions,
            elapsed_time: 60.0,
        });
        app.apply_poll_event(PollEvent::Snapshot(snapshot));

        assert!(app.recovery.visible);
        assert_eq!(app.displayed_level("hydration"), 0.3);
    }

    #[tokio::test]
    async fn test_preview_is_local_and_committable() {
        let mut app = test_app();
        app.set_view(View::Recovery);
        app.selected_intervention = 0; // hydration

        app.adjust_preview(LEVEL_STEP);
        app.adjust_preview(LEVEL_STEP);
        assert_eq!(app.preview_level, Some(0.1));
        // Nothing dispatched yet: optimistic view untouched
        assert_eq!(app.controller.level("hydration"), None);

        app.commit_preview();
        assert_eq!(app.controller.level("hydration"), Some(0.1));
        assert!(app.preview_level.is_none());
    }

    #[tokio::test]
    async fn test_preview_clamped() {
        let mut app = test_app();
        app.set_view(View::Recovery);
        app.adjust_preview(5.0);
        assert_eq!(app.preview_level, Some(1.0));
        app.adjust_preview(-10.0);
        assert_eq!(app.preview_level, Some(0.0));
    }

    #[tokio::test]
    async fn test_recovery_commands_toggle_visibility() {
        let mut app = test_app();

        app.apply_command_result(
            InterventionCommand::StartRecovery { severity: 0.7 },
            Ok(()),
        );
        assert!(app.recovery.visible);

        app.apply_command_result(InterventionCommand::StopRecovery, Ok(()));
        assert!(!app.recovery.visible);
    }

    #[tokio::test]
    async fn test_failed_command_only_sets_status() {
        let mut app = test_app();
        app.controller.set_level("rest", 0.6);

        app.apply_command_result(
            InterventionCommand::SetLevel {
                kind: "rest".to_string(),
                level: 0.6,
            },
            Err(CommandError::Status(500)),
        );

        assert_eq!(app.controller.level("rest"), Some(0.6));
        assert!(app.get_status_message().unwrap().contains("failed"));
    }

    #[tokio::test]
    async fn test_intervention_names_catalog_first() {
        let mut app = test_app();
        let mut snapshot = snapshot_with_series("heart_rate", 1);
        let mut interventions = BTreeMap::new();
        interventions.insert("cryotherapy".to_string(), 0.2);
        interventions.insert("hydration".to_string(), 0.5);
        snapshot.recovery = Some(crate::source::RawRecoveryStatus {
            active: true,
            interventions,
            ..Default::default()
        });
        app.apply_poll_event(PollEvent::Snapshot(snapshot));

        let names = app.intervention_names();
        assert_eq!(names[0], "hydration");
        assert!(names.contains(&"cryotherapy".to_string()));
        assert_eq!(names.iter().filter(|n| *n == "hydration").count(), 1);
    }

    #[test]
    fn test_parse_empty_raw_snapshot_is_non_update() {
        let raw: RawSnapshot = serde_json::from_str("{}").unwrap();
        assert!(!Snapshot::from_raw(raw).is_update());
    }
}
