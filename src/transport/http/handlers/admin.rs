use crate::transport::http::types::{
    error_response, json_422, AppState, BackupRequest, BackupResponse, ErrorBody, OkBody,
    RestoreRequest,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/admin/backup",
    request_body = BackupRequest,
    responses(
        (status = 200, description = "Snapshot written", body = BackupResponse),
        (status = 400, description = "Invalid reason", body = ErrorBody),
        (status = 500, description = "Snapshot failed", body = ErrorBody)
    )
)]
pub async fn backup_handler(
    State(state): State<AppState>,
    body: Result<Json<BackupRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match body {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"reason\": \"manual\"}"),
    };
    let reason = request.reason.unwrap_or_else(|| "manual".to_string());
    let service = state.service.lock().await;
    match service.snapshot(&reason).await {
        Ok(file) => Json(BackupResponse {
            ok: true,
            file: file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/admin/restore",
    request_body = RestoreRequest,
    responses(
        (status = 200, description = "Snapshot restored", body = OkBody),
        (status = 400, description = "Missing confirm or invalid file name", body = ErrorBody),
        (status = 404, description = "Snapshot not found", body = ErrorBody),
        (status = 500, description = "Restore failed", body = ErrorBody)
    )
)]
pub async fn restore_handler(
    State(state): State<AppState>,
    body: Result<Json<RestoreRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match body {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"file\": \"db_backup_...json\", \"confirm\": true}"),
    };
    if !request.confirm {
        return error_response(
            StatusCode::BAD_REQUEST,
            "confirm must be true to restore a snapshot",
        );
    }
    let service = state.service.lock().await;
    match service.restore(&request.file).await {
        Ok(()) => {
            // The whole document may have changed under the listeners.
            state.notifier.broadcast("products");
            state.notifier.broadcast("clients");
            state.notifier.broadcast("rate");
            OkBody::ok().into_response()
        }
        Err(e) => e.into_response(),
    }
}
