//! The single persisted aggregate: every collection plus settings and
//! bookkeeping metadata, serialized as one JSON document.

use super::records::{Client, Product, Transaction};
use super::StoreRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::warn;

pub const SCHEMA_VERSION: &str = "1.0.0";
pub const DEFAULT_RATE: f64 = 216.38;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub currency: String,
    pub language: String,
    pub timezone: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            currency: "USD".to_string(),
            language: "es".to_string(),
            timezone: "America/Caracas".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_backup: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_transactions: u64,
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            created: Utc::now(),
            last_backup: None,
            last_modified: None,
            total_transactions: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: String,
    pub products: Vec<Product>,
    pub clients: Vec<Client>,
    pub transactions: Vec<Transaction>,
    pub rate: f64,
    pub settings: Settings,
    pub metadata: Metadata,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            version: SCHEMA_VERSION.to_string(),
            products: Vec::new(),
            clients: Vec::new(),
            transactions: Vec::new(),
            rate: DEFAULT_RATE,
            settings: Settings::default(),
            metadata: Metadata::default(),
        }
    }
}

impl Document {
    /// Lenient decode of whatever was found on disk: raw values are
    /// merged over a full-default document so every top-level key
    /// exists, each collection entry is passed through its validator
    /// (failures are dropped), and an out-of-range `rate` falls back to
    /// the default. Never fails; worst case is an all-default document.
    pub fn from_raw(raw: &JsonValue) -> Document {
        let mut doc = Document::default();
        let Some(obj) = raw.as_object() else {
            return doc;
        };

        if let Some(version) = obj.get("version").and_then(JsonValue::as_str) {
            doc.version = version.to_string();
        }
        doc.products = filter_collection::<Product>(obj.get("products"));
        doc.clients = filter_collection::<Client>(obj.get("clients"));
        doc.transactions = filter_collection::<Transaction>(obj.get("transactions"));

        if let Some(rate) = obj.get("rate").and_then(JsonValue::as_f64) {
            if rate.is_finite() && rate > 0.0 {
                doc.rate = rate;
            } else {
                warn!(rate, "stored rate out of range, falling back to default");
            }
        }
        if let Some(settings) = obj.get("settings") {
            doc.settings = Settings::from_raw(settings);
        }
        if let Some(metadata) = obj.get("metadata") {
            doc.metadata = Metadata::from_raw(metadata);
        }
        doc
    }
}

impl Settings {
    fn from_raw(raw: &JsonValue) -> Settings {
        let mut settings = Settings::default();
        if let Some(obj) = raw.as_object() {
            if let Some(v) = obj.get("currency").and_then(JsonValue::as_str) {
                settings.currency = v.to_string();
            }
            if let Some(v) = obj.get("language").and_then(JsonValue::as_str) {
                settings.language = v.to_string();
            }
            if let Some(v) = obj.get("timezone").and_then(JsonValue::as_str) {
                settings.timezone = v.to_string();
            }
        }
        settings
    }
}

impl Metadata {
    fn from_raw(raw: &JsonValue) -> Metadata {
        let mut metadata = Metadata::default();
        if let Some(obj) = raw.as_object() {
            if let Some(v) = obj.get("created").and_then(parse_datetime) {
                metadata.created = v;
            }
            metadata.last_backup = obj.get("lastBackup").and_then(parse_datetime);
            metadata.last_modified = obj.get("lastModified").and_then(parse_datetime);
            if let Some(v) = obj.get("totalTransactions").and_then(JsonValue::as_u64) {
                metadata.total_transactions = v;
            }
        }
        metadata
    }
}

fn parse_datetime(raw: &JsonValue) -> Option<DateTime<Utc>> {
    raw.as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Keeps the entries of a raw collection that pass their validator.
fn filter_collection<R: StoreRecord>(raw: Option<&JsonValue>) -> Vec<R> {
    let Some(items) = raw.and_then(JsonValue::as_array) else {
        return Vec::new();
    };
    let mut kept = Vec::with_capacity(items.len());
    let mut dropped = 0usize;
    for item in items {
        match R::parse(item.clone()) {
            Ok(record) => kept.push(record),
            Err(_) => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!(
            collection = R::collection_name(),
            dropped, "dropped invalid records on load"
        );
    }
    kept
}
