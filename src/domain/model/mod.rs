//! Domain model: the persisted document and its record kinds.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

pub mod document;
pub mod records;

pub use document::{Document, Metadata, Settings, DEFAULT_RATE, SCHEMA_VERSION};
pub use records::{Categoria, Client, Estado, LineItem, MetodoPago, Product, Transaction};

/// Contract every persisted record kind implements.
///
/// The API layer and the store work with records through this trait
/// without knowing their specific schema:
/// - the collection they live in inside the [`Document`]
/// - shape/range validation for candidate records
///
/// Validation is a pure check: malformed input yields an error, never a
/// panic, and nothing is mutated.
pub trait StoreRecord: Serialize + DeserializeOwned + Sized {
    /// Name of the document collection holding this record kind.
    fn collection_name() -> &'static str;

    /// Validates a deserialized record against its range/enum contract.
    /// Returns `Err(String)` with a message suitable for an API response.
    fn validate(&self) -> Result<(), String>;

    /// Deserializes and validates a raw JSON value in one step. A value
    /// that does not even have the record's shape is as invalid as one
    /// that fails a range check.
    fn parse(raw: JsonValue) -> Result<Self, String> {
        let record: Self = serde_json::from_value(raw).map_err(|e| e.to_string())?;
        record.validate()?;
        Ok(record)
    }

    /// Pure accept/reject predicate over raw JSON.
    fn is_valid(raw: &JsonValue) -> bool {
        Self::parse(raw.clone()).is_ok()
    }
}
