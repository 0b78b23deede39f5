//! The three record kinds stored in the document.
//!
//! Field names on the wire (and on disk) are the storefront's original
//! Spanish ones, so existing database files and the browser UI keep
//! working unchanged.

use super::StoreRecord;
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Product category. Unrecognized values are rejected at the
/// deserialization boundary, never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Categoria {
    Accesorios,
    Computadoras,
    Componentes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetodoPago {
    Efectivo,
    Transferencia,
    PagoMovil,
    Zelle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Estado {
    Pendiente,
    Completada,
    Cancelada,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Assigned on create when empty.
    #[serde(default)]
    pub id: String,
    pub nombre: String,
    pub precio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<Categoria>,
    #[serde(rename = "DISPONIBLE", default, skip_serializing_if = "Option::is_none")]
    pub disponible: Option<f64>,
    #[serde(rename = "urlImagen", default, skip_serializing_if = "Option::is_none")]
    pub url_imagen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(rename = "fechaCreacion", default, skip_serializing_if = "Option::is_none")]
    pub fecha_creacion: Option<DateTime<Utc>>,
    #[serde(rename = "ultimaActualizacion", default, skip_serializing_if = "Option::is_none")]
    pub ultima_actualizacion: Option<DateTime<Utc>>,
}

impl StoreRecord for Product {
    fn collection_name() -> &'static str {
        "products"
    }

    fn validate(&self) -> Result<(), String> {
        if self.nombre.is_empty() {
            return Err("Product must have a name".to_string());
        }
        if !self.precio.is_finite() || self.precio < 0.0 {
            return Err("Product price cannot be negative".to_string());
        }
        if matches!(self.disponible, Some(d) if d < 0.0) {
            return Err("Product available quantity cannot be negative".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Client {
    /// Assigned on create when empty.
    #[serde(default)]
    pub id: String,
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    /// Secondary uniqueness key: no two clients may share a cedula.
    /// Checked on create only, never re-checked on update.
    pub cedula: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(rename = "fechaRegistro", default, skip_serializing_if = "Option::is_none")]
    pub fecha_registro: Option<DateTime<Utc>>,
    #[serde(rename = "ultimaActividad", default, skip_serializing_if = "Option::is_none")]
    pub ultima_actividad: Option<DateTime<Utc>>,
}

impl StoreRecord for Client {
    fn collection_name() -> &'static str {
        "clients"
    }

    fn validate(&self) -> Result<(), String> {
        if self.nombre.is_empty() {
            return Err("Client must have a name".to_string());
        }
        if self.cedula.is_empty() {
            return Err("Client must have a cedula".to_string());
        }
        if matches!(self.balance, Some(b) if b < 0.0) {
            return Err("Client balance cannot be negative".to_string());
        }
        Ok(())
    }
}

/// One cart line: the product fields the UI submits plus a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cantidad: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    /// Assigned as `TXN-XXXXXXXX` on checkout when empty.
    #[serde(default)]
    pub id: String,
    /// Foreign key into the clients collection; dangling references are
    /// tolerated (the client may have been deleted since).
    #[serde(rename = "clienteId")]
    pub cliente_id: String,
    pub productos: Vec<LineItem>,
    pub total: f64,
    #[serde(rename = "metodoPago", default, skip_serializing_if = "Option::is_none")]
    pub metodo_pago: Option<MetodoPago>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<Estado>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
}

impl Transaction {
    /// Generates a `TXN-XXXXXXXX` id (8 uppercase alphanumeric chars).
    pub fn generate_id() -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();
        format!("TXN-{}", suffix.to_uppercase())
    }
}

impl StoreRecord for Transaction {
    fn collection_name() -> &'static str {
        "transactions"
    }

    fn validate(&self) -> Result<(), String> {
        if self.cliente_id.is_empty() {
            return Err("Transaction must have a clienteId".to_string());
        }
        if !self.total.is_finite() || self.total < 0.0 {
            return Err("Transaction total cannot be negative".to_string());
        }
        Ok(())
    }
}
