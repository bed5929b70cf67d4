//! Append-only deployment log on the filesystem.
//!
//! Each record lands in its own `{createdMillis}-agent-{agentId}.json` file. The leading
//! millisecond prefix is the only ordering key; there is no index file.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::deploy::DeploymentRecord;
use crate::error::{CreatorError, CreatorResult};

pub struct DeploymentStore {
    dir: PathBuf,
}

impl DeploymentStore {
    /// Open the store, creating its directory if needed.
    pub async fn open<P: Into<PathBuf>>(dir: P) -> CreatorResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        debug!("Deployment store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a new record. An existing file with the same name is never replaced.
    pub async fn append(&self, record: &DeploymentRecord) -> CreatorResult<PathBuf> {
        let filename = record_filename(record.created_millis(), &record.agent.id);
        let path = self.dir.join(&filename);
        let body = serde_json::to_vec_pretty(record)?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    CreatorError::store(format!("record {} already exists", filename))
                }
                _ => CreatorError::Io(e),
            })?;
        file.write_all(&body).await?;
        file.flush().await?;

        info!("Saved deployment record {}", path.display());
        Ok(path)
    }

    /// Most recently created record, or `None` for an empty store.
    pub async fn latest(&self) -> CreatorResult<Option<DeploymentRecord>> {
        // Ties on the millisecond prefix go to the lexically greatest filename.
        let mut newest: Option<(i64, String)> = None;

        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else { continue };
            let Some(millis) = creation_millis(&name) else {
                debug!("Ignoring non-record file {}", name);
                continue;
            };
            let candidate = (millis, name);
            if newest.as_ref().map_or(true, |best| candidate > *best) {
                newest = Some(candidate);
            }
        }

        let Some((_, name)) = newest else {
            return Ok(None);
        };
        let path = self.dir.join(name);

        let content = fs::read(&path).await?;
        let record = serde_json::from_slice(&content).map_err(|e| {
            warn!("Unreadable deployment record {}: {}", path.display(), e);
            CreatorError::store(format!("unreadable record {}: {}", path.display(), e))
        })?;
        Ok(Some(record))
    }
}

pub fn record_filename(created_millis: i64, agent_id: &str) -> String {
    format!("{}-agent-{}.json", created_millis, agent_id)
}

/// Leading numeric prefix of a record filename.
pub fn creation_millis(filename: &str) -> Option<i64> {
    if !filename.ends_with(".json") {
        return None;
    }
    filename.split('-').next()?.parse().ok()
}
