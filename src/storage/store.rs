//! Sole owner of the on-disk JSON document.
//!
//! Every read and every write of the database file goes through
//! [`JsonStore`]. Writes are atomic (write to a temp file, fsync,
//! rename) so a concurrent reader never observes a half-written
//! document.

use crate::domain::model::Document;
use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{json, Value as JsonValue};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the raw file. `Ok(None)` means the file does not
    /// exist yet; read or parse failures surface as errors so callers
    /// can distinguish "fresh install" from "broken store".
    pub async fn read_raw(&self) -> Result<Option<JsonValue>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("read database {}", self.path.display()))
            }
        };
        let raw = serde_json::from_str(&content)
            .with_context(|| format!("parse database {}", self.path.display()))?;
        Ok(Some(raw))
    }

    /// Loads the current document. Never fails: a missing or unreadable
    /// file yields an all-default document (the condition is logged),
    /// and invalid records inside a readable file are dropped by the
    /// lenient decode.
    pub async fn load(&self) -> Document {
        match self.read_raw().await {
            Ok(Some(raw)) => Document::from_raw(&raw),
            Ok(None) => Document::default(),
            Err(e) => {
                warn!(error = %e, "database unreadable, serving defaults");
                Document::default()
            }
        }
    }

    /// Persists the document, stamping `metadata.lastModified` first.
    pub async fn save(&self, doc: &mut Document) -> Result<()> {
        doc.metadata.last_modified = Some(Utc::now());
        let bytes = serde_json::to_vec_pretty(doc).context("serialize document")?;
        atomic_write(&self.path, &bytes)
            .await
            .with_context(|| format!("write database {}", self.path.display()))
    }

    /// Verbatim persistence used by snapshot restore: no merge and no
    /// re-validation, only the `lastModified` stamp.
    pub async fn persist_raw(&self, mut raw: JsonValue) -> Result<()> {
        if let Some(metadata) = raw.get_mut("metadata").and_then(JsonValue::as_object_mut) {
            metadata.insert("lastModified".to_string(), json!(Utc::now()));
        } else if let Some(obj) = raw.as_object_mut() {
            obj.insert("metadata".to_string(), json!({ "lastModified": Utc::now() }));
        }
        let bytes = serde_json::to_vec_pretty(&raw).context("serialize document")?;
        atomic_write(&self.path, &bytes)
            .await
            .with_context(|| format!("write database {}", self.path.display()))
    }

    /// One-time startup migration: merges the raw file over a
    /// full-default document, drops invalid records, backfills missing
    /// product timestamps and persists the result. Idempotent.
    pub async fn migrate(&self, raw: &JsonValue) -> Result<Document> {
        let mut doc = Document::from_raw(raw);
        let now = Utc::now();
        for product in &mut doc.products {
            if product.fecha_creacion.is_none() {
                product.fecha_creacion = Some(now);
            }
            if product.ultima_actualizacion.is_none() {
                product.ultima_actualizacion = Some(now);
            }
        }
        self.save(&mut doc).await?;
        Ok(doc)
    }
}

/// Write -> fsync -> rename, so the destination always holds either the
/// old or the new content in full.
pub(crate) async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let temp_path = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(content).await?;
        file.sync_all().await?;
    }
    fs::rename(&temp_path, path).await?;
    Ok(())
}
