use crate::app::notifier::ChangeNotifier;
use crate::app::store_service::{ServiceError, StoreService};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    /// The one mutex serializing every read-modify-persist cycle.
    pub service: Arc<Mutex<StoreService>>,
    pub notifier: Arc<ChangeNotifier>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OkBody {
    pub ok: bool,
}

impl OkBody {
    pub fn ok() -> Json<OkBody> {
        Json(OkBody { ok: true })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RateBody {
    pub rate: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RateUpdateBody {
    /// Number or numeric string; validated server-side.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub rate: JsonValue,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BackupRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BackupResponse {
    pub ok: bool,
    /// File name of the snapshot inside the backup directory.
    pub file: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RestoreRequest {
    /// Snapshot file name inside the backup directory.
    pub file: String,
    /// Safety switch to prevent accidental restores.
    #[serde(default)]
    pub confirm: bool,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

pub fn json_422(err: JsonRejection, expected: &str) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        format!("Invalid JSON body: {} (expected: {})", err, expected),
    )
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Validation(_) | ServiceError::Conflict(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        error_response(status, self.to_string())
    }
}
