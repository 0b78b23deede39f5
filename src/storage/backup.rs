//! On-demand snapshots of the database file.
//!
//! Snapshots are plain copies of the document named after the reason
//! they were taken; nothing ever rotates or deletes them.

use crate::storage::store::{atomic_write, JsonStore};
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

#[derive(Debug, Clone)]
pub struct BackupManager {
    dir: PathBuf,
}

impl BackupManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        BackupManager { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the current document to
    /// `db_backup_<reason>_<timestamp>.json` and stamps
    /// `metadata.lastBackup` on the live document. The timestamp keeps
    /// millisecond precision, so each invocation gets its own file.
    pub async fn snapshot(&self, store: &JsonStore, reason: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create backup directory {}", self.dir.display()))?;

        let mut doc = store.load().await;
        let stamp = Utc::now()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace(':', "-")
            .replace('.', "-");
        let file = self.dir.join(format!("db_backup_{}_{}.json", reason, stamp));

        let bytes = serde_json::to_vec_pretty(&doc).context("serialize snapshot")?;
        atomic_write(&file, &bytes)
            .await
            .with_context(|| format!("write snapshot {}", file.display()))?;

        doc.metadata.last_backup = Some(Utc::now());
        store.save(&mut doc).await?;

        info!(file = %file.display(), reason, "backup created");
        Ok(file)
    }

    /// Replaces the live document with the named snapshot, verbatim: no
    /// merge and no re-validation. Callers vouch for the snapshot.
    pub async fn restore(&self, store: &JsonStore, file_name: &str) -> Result<()> {
        let path = self.dir.join(file_name);
        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("read snapshot {}", path.display()))?;
        let raw: JsonValue = serde_json::from_str(&content)
            .with_context(|| format!("parse snapshot {}", path.display()))?;
        store.persist_raw(raw).await?;
        info!(file = %path.display(), "database restored from snapshot");
        Ok(())
    }
}
