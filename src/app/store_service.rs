//! The store service: every collection operation the API exposes.
//!
//! Each operation is one read-modify-persist cycle against the single
//! document. The service itself holds no document state between calls;
//! the whole service sits behind one mutex in the application state, so
//! cycles never interleave and the last-write-wins race of concurrent
//! whole-file writers cannot occur.

use crate::domain::model::{Client, Document, Product, StoreRecord, Transaction};
use crate::storage::{BackupManager, JsonStore};
use chrono::Utc;
use serde_json::{json, Value as JsonValue};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or out-of-range record; nothing was persisted.
    #[error("{0}")]
    Validation(String),
    /// The targeted id is absent from its collection.
    #[error("{0}")]
    NotFound(String),
    /// A uniqueness rule rejected the operation.
    #[error("{0}")]
    Conflict(String),
    /// The database file could not be written; the request fails but
    /// the process keeps serving.
    #[error("store failure: {0}")]
    Store(#[from] anyhow::Error),
}

pub struct StoreService {
    store: JsonStore,
    backups: BackupManager,
}

impl StoreService {
    pub fn new(store: JsonStore, backups: BackupManager) -> Self {
        StoreService { store, backups }
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Startup initialization: a missing database file is created from
    /// defaults and snapshotted (`initial`); an existing one is
    /// migrated in place. Failures here are fatal to the process.
    pub async fn initialize(&self) -> anyhow::Result<()> {
        match self.store.read_raw().await {
            Ok(Some(raw)) => {
                self.store.migrate(&raw).await?;
                info!(db = %self.store.path().display(), "database loaded");
            }
            Ok(None) => {
                info!(db = %self.store.path().display(), "database not found, creating a new one");
                let mut doc = Document::default();
                self.store.save(&mut doc).await?;
                self.backups.snapshot(&self.store, "initial").await?;
            }
            Err(e) => {
                tracing::warn!(error = %e, "database unreadable, rebuilding from defaults");
                self.store.migrate(&JsonValue::Null).await?;
            }
        }
        Ok(())
    }

    // --- products ---

    pub async fn list_products(&self) -> Vec<Product> {
        self.store.load().await.products
    }

    pub async fn create_product(&self, raw: JsonValue) -> Result<Product, ServiceError> {
        let mut product = Product::parse(raw).map_err(ServiceError::Validation)?;
        let now = Utc::now();
        if product.id.is_empty() {
            product.id = format!("p{}", now.timestamp_millis());
        }
        if product.fecha_creacion.is_none() {
            product.fecha_creacion = Some(now);
        }
        product.ultima_actualizacion = Some(now);

        let mut doc = self.store.load().await;
        doc.products.push(product.clone());
        self.store.save(&mut doc).await?;
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: &str,
        patch: JsonValue,
    ) -> Result<Product, ServiceError> {
        let mut doc = self.store.load().await;
        let index = doc
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ServiceError::NotFound("Producto no encontrado".to_string()))?;

        let mut merged = merge_record(&doc.products[index], &patch)?;
        if let Some(map) = merged.as_object_mut() {
            map.insert("ultimaActualizacion".to_string(), json!(Utc::now()));
        }
        let updated = Product::parse(merged).map_err(ServiceError::Validation)?;
        doc.products[index] = updated.clone();
        self.store.save(&mut doc).await?;
        Ok(updated)
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), ServiceError> {
        let mut doc = self.store.load().await;
        let index = doc
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ServiceError::NotFound("Producto no encontrado".to_string()))?;
        doc.products.remove(index);
        self.store.save(&mut doc).await?;
        Ok(())
    }

    // --- clients ---

    pub async fn list_clients(&self) -> Vec<Client> {
        self.store.load().await.clients
    }

    pub async fn create_client(&self, raw: JsonValue) -> Result<Client, ServiceError> {
        let mut client = Client::parse(raw).map_err(ServiceError::Validation)?;

        let mut doc = self.store.load().await;
        if doc.clients.iter().any(|c| c.cedula == client.cedula) {
            return Err(ServiceError::Conflict(
                "Ya existe un cliente con esta cédula".to_string(),
            ));
        }

        let now = Utc::now();
        if client.id.is_empty() {
            client.id = format!("client_{}", now.timestamp_millis());
        }
        if client.fecha_registro.is_none() {
            client.fecha_registro = Some(now);
        }

        doc.clients.push(client.clone());
        self.store.save(&mut doc).await?;
        Ok(client)
    }

    /// Shallow-merges the patch over the stored client. The cedula is
    /// deliberately not re-checked for uniqueness here.
    pub async fn update_client(&self, id: &str, patch: JsonValue) -> Result<Client, ServiceError> {
        let mut doc = self.store.load().await;
        let index = doc
            .clients
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ServiceError::NotFound("Cliente no encontrado".to_string()))?;

        let merged = merge_record(&doc.clients[index], &patch)?;
        let updated = Client::parse(merged).map_err(ServiceError::Validation)?;
        doc.clients[index] = updated.clone();
        self.store.save(&mut doc).await?;
        Ok(updated)
    }

    pub async fn delete_client(&self, id: &str) -> Result<(), ServiceError> {
        let mut doc = self.store.load().await;
        let index = doc
            .clients
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ServiceError::NotFound("Cliente no encontrado".to_string()))?;
        doc.clients.remove(index);
        self.store.save(&mut doc).await?;
        Ok(())
    }

    // --- transactions ---

    pub async fn checkout(&self, raw: JsonValue) -> Result<Transaction, ServiceError> {
        let mut transaction = Transaction::parse(raw).map_err(ServiceError::Validation)?;
        if transaction.id.is_empty() {
            transaction.id = Transaction::generate_id();
        }
        if transaction.fecha.is_none() {
            transaction.fecha = Some(Utc::now());
        }

        let mut doc = self.store.load().await;
        doc.transactions.push(transaction.clone());
        doc.metadata.total_transactions += 1;
        self.store.save(&mut doc).await?;
        Ok(transaction)
    }

    pub async fn history(&self) -> Vec<Transaction> {
        self.store.load().await.transactions
    }

    // --- rate ---

    pub async fn rate(&self) -> f64 {
        self.store.load().await.rate
    }

    /// Accepts a JSON number or a numeric string (the storefront UI
    /// submits both); anything non-finite or not strictly positive is
    /// rejected without touching the stored rate.
    pub async fn set_rate(&self, value: &JsonValue) -> Result<f64, ServiceError> {
        let rate = coerce_rate(value)
            .ok_or_else(|| ServiceError::Validation("Invalid rate".to_string()))?;
        let mut doc = self.store.load().await;
        doc.rate = rate;
        self.store.save(&mut doc).await?;
        Ok(rate)
    }

    // --- backups ---

    pub async fn snapshot(&self, reason: &str) -> Result<PathBuf, ServiceError> {
        if reason.is_empty()
            || !reason
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ServiceError::Validation(
                "backup reason must be alphanumeric".to_string(),
            ));
        }
        Ok(self.backups.snapshot(&self.store, reason).await?)
    }

    pub async fn restore(&self, file_name: &str) -> Result<(), ServiceError> {
        if file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name.contains("..")
        {
            return Err(ServiceError::Validation(
                "invalid snapshot file name".to_string(),
            ));
        }
        if !self.backups.dir().join(file_name).exists() {
            return Err(ServiceError::NotFound(format!(
                "snapshot not found: {}",
                file_name
            )));
        }
        self.backups.restore(&self.store, file_name).await?;
        Ok(())
    }
}

/// Shallow merge of patch fields over the serialized record, the same
/// field-wise spread the storefront always used for updates.
fn merge_record<R: StoreRecord>(base: &R, patch: &JsonValue) -> Result<JsonValue, ServiceError> {
    let patch_map = patch
        .as_object()
        .ok_or_else(|| ServiceError::Validation("update payload must be a JSON object".to_string()))?;
    let mut merged = serde_json::to_value(base).map_err(anyhow::Error::from)?;
    if let Some(map) = merged.as_object_mut() {
        for (key, value) in patch_map {
            map.insert(key.clone(), value.clone());
        }
    }
    Ok(merged)
}

fn coerce_rate(value: &JsonValue) -> Option<f64> {
    let rate = match value {
        JsonValue::Number(n) => n.as_f64()?,
        JsonValue::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}
