//! File snapshot source.
//!
//! The backend writes its snapshot to `data.json` on disk before serving it;
//! reading that file directly gives an offline/demo mode with identical
//! semantics to the HTTP source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{RawSnapshot, Snapshot, SnapshotSource, SourceError};

/// Reads snapshots from a JSON file on every fetch.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn fetch(&self) -> Result<Snapshot, SourceError> {
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Io(e.to_string()))?;

        let raw: RawSnapshot =
            serde_json::from_str(&content).map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(Snapshot::from_raw(raw))
    }

    fn description(&self) -> &str {
        &self.description
    }
}
