//! HTTP snapshot source.
//!
//! Fetches the backend's `data.json` with a cache-defeating query parameter,
//! the same document its bundled web page polls.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::Client;

use super::{RawSnapshot, Snapshot, SnapshotSource, SourceError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Polls a snapshot endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
    description: String,
}

impl HttpSource {
    /// Create a source for `<base>/data.json`.
    ///
    /// `base` is the backend root, e.g. `http://localhost:8000`.
    pub fn new(base: &str) -> Self {
        let url = format!("{}/data.json", base.trim_end_matches('/'));
        Self::for_url(url)
    }

    /// Create a source that fetches an exact URL.
    pub fn for_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let description = format!("http: {}", url);
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            url,
            description,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn cache_buster() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis()
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch(&self) -> Result<Snapshot, SourceError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("t", Self::cache_buster().to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let raw: RawSnapshot =
            serde_json::from_str(&body).map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(Snapshot::from_raw(raw))
    }

    fn description(&self) -> &str {
        &self.description
    }
}
