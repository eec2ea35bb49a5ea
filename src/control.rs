//! Intervention control: optimistic local updates plus remote commands.
//!
//! Level changes apply to the local view first so the panel reflects the
//! operator's input before the network round-trip finishes. A failed command
//! is logged and the optimistic value left in place; the next poll
//! reconciles it with server truth. Eventually consistent, not strongly
//! consistent.

use std::collections::BTreeMap;

use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// A dispatched intervention or recovery command failed.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command request failed: {0}")]
    Transport(String),

    #[error("command rejected with status {0}")]
    Status(u16),
}

/// Outbound command; constructed per dispatch, never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum InterventionCommand {
    SetLevel { kind: String, level: f64 },
    StartRecovery { severity: f64 },
    StopRecovery,
}

impl InterventionCommand {
    fn path(&self) -> &'static str {
        match self {
            InterventionCommand::SetLevel { .. } => "/api/intervention",
            InterventionCommand::StartRecovery { .. } => "/api/recovery/start",
            InterventionCommand::StopRecovery => "/api/recovery/stop",
        }
    }

    fn body(&self) -> serde_json::Value {
        match self {
            InterventionCommand::SetLevel { kind, level } => {
                json!({ "type": kind, "level": level })
            }
            InterventionCommand::StartRecovery { severity } => json!({ "severity": severity }),
            InterventionCommand::StopRecovery => json!({}),
        }
    }
}

/// Thin HTTP client for the backend's command endpoints.
#[derive(Debug, Clone)]
pub struct CommandClient {
    client: Client,
    base: String,
}

impl CommandClient {
    pub fn new(base: &str) -> Self {
        Self {
            client: Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// POST the command; any non-2xx response is a failure.
    pub async fn send(&self, cmd: &InterventionCommand) -> Result<(), CommandError> {
        let url = format!("{}{}", self.base, cmd.path());
        let response = self
            .client
            .post(&url)
            .json(&cmd.body())
            .send()
            .await
            .map_err(|e| CommandError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CommandError::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// Owns the optimistic intervention levels and dispatches commands in the
/// background. Must be used inside a tokio runtime.
#[derive(Debug)]
pub struct InterventionController {
    client: CommandClient,
    levels: BTreeMap<String, f64>,
    results_tx: mpsc::UnboundedSender<(InterventionCommand, Result<(), CommandError>)>,
    results_rx: mpsc::UnboundedReceiver<(InterventionCommand, Result<(), CommandError>)>,
}

impl InterventionController {
    pub fn new(client: CommandClient) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            client,
            levels: BTreeMap::new(),
            results_tx,
            results_rx,
        }
    }

    /// Clamp, update the optimistic view, then dispatch. Returns the level
    /// actually applied.
    pub fn set_level(&mut self, kind: &str, level: f64) -> f64 {
        let level = level.clamp(0.0, 1.0);
        self.levels.insert(kind.to_string(), level);
        self.dispatch(InterventionCommand::SetLevel {
            kind: kind.to_string(),
            level,
        });
        level
    }

    /// Fire-and-forget start of a recovery simulation.
    pub fn start_recovery(&mut self, severity: f64) {
        let severity = severity.clamp(0.0, 1.0);
        self.dispatch(InterventionCommand::StartRecovery { severity });
    }

    /// Fire-and-forget stop of the running simulation.
    pub fn stop_recovery(&mut self) {
        self.dispatch(InterventionCommand::StopRecovery);
    }

    /// The optimistic level for an intervention, if one is known.
    pub fn level(&self, kind: &str) -> Option<f64> {
        self.levels.get(kind).copied()
    }

    pub fn levels(&self) -> &BTreeMap<String, f64> {
        &self.levels
    }

    /// Replace the optimistic view with server truth from the latest poll.
    pub fn reconcile(&mut self, server_levels: &BTreeMap<String, f64>) {
        self.levels = server_levels.clone();
    }

    /// Collect finished dispatches for status reporting. Failures have
    /// already been logged and never roll back the optimistic view.
    pub fn drain_results(&mut self) -> Vec<(InterventionCommand, Result<(), CommandError>)> {
        let mut results = Vec::new();
        while let Ok(entry) = self.results_rx.try_recv() {
            results.push(entry);
        }
        results
    }

    fn dispatch(&self, cmd: InterventionCommand) {
        let client = self.client.clone();
        let tx = self.results_tx.clone();
        tokio::spawn(async move {
            let result = client.send(&cmd).await;
            match &result {
                Ok(()) => info!(?cmd, "command accepted"),
                Err(err) => warn!(?cmd, error = %err, "command failed"),
            }
            let _ = tx.send((cmd, result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};
    use std::time::Duration;

    async fn wait_for_result(
        controller: &mut InterventionController,
    ) -> (InterventionCommand, Result<(), CommandError>) {
        for _ in 0..100 {
            if let Some(entry) = controller.drain_results().pop() {
                return entry;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("command never completed");
    }

    #[tokio::test]
    async fn test_set_level_clamps_before_dispatch() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/intervention")
                    .json_body(serde_json::json!({ "type": "cooling", "level": 1.0 }));
                then.status(200);
            })
            .await;

        let mut controller = InterventionController::new(CommandClient::new(&server.base_url()));
        let applied = controller.set_level("cooling", 1.4);

        // Clamped in the optimistic view immediately, before the dispatch
        // has had any chance to complete.
        assert_eq!(applied, 1.0);
        assert_eq!(controller.level("cooling"), Some(1.0));

        let (_, result) = wait_for_result(&mut controller).await;
        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_command_keeps_optimistic_value() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/intervention");
                then.status(500);
            })
            .await;

        let mut controller = InterventionController::new(CommandClient::new(&server.base_url()));
        controller.set_level("hydration", 0.8);

        let (_, result) = wait_for_result(&mut controller).await;
        assert!(matches!(result, Err(CommandError::Status(500))));

        // No rollback; the next poll reconciles with server truth.
        assert_eq!(controller.level("hydration"), Some(0.8));
    }

    #[tokio::test]
    async fn test_recovery_commands_hit_their_endpoints() {
        let server = MockServer::start_async().await;
        let start = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/recovery/start")
                    .json_body(serde_json::json!({ "severity": 0.7 }));
                then.status(200);
            })
            .await;
        let stop = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/recovery/stop")
                    .json_body(serde_json::json!({}));
                then.status(200);
            })
            .await;

        let mut controller = InterventionController::new(CommandClient::new(&server.base_url()));
        controller.start_recovery(0.7);
        wait_for_result(&mut controller).await.1.unwrap();
        controller.stop_recovery();
        wait_for_result(&mut controller).await.1.unwrap();

        start.assert_async().await;
        stop.assert_async().await;
    }

    #[tokio::test]
    async fn test_start_recovery_clamps_severity() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/recovery/start")
                    .json_body(serde_json::json!({ "severity": 1.0 }));
                then.status(200);
            })
            .await;

        let mut controller = InterventionController::new(CommandClient::new(&server.base_url()));
        controller.start_recovery(3.0);
        wait_for_result(&mut controller).await.1.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_reconcile_overwrites_optimistic_view() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/intervention");
                then.status(200);
            })
            .await;

        let mut controller = InterventionController::new(CommandClient::new(&server.base_url()));
        controller.set_level("rest", 0.9);

        let mut server_levels = BTreeMap::new();
        server_levels.insert("rest".to_string(), 0.4);
        controller.reconcile(&server_levels);
        assert_eq!(controller.level("rest"), Some(0.4));
    }
}
