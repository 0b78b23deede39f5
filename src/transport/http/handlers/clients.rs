use crate::domain::model::Client;
use crate::transport::http::types::{json_422, AppState, ErrorBody, OkBody};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value as JsonValue;

#[utoipa::path(
    get,
    path = "/api/clients",
    responses(
        (status = 200, description = "Every registered client", body = Vec<Client>)
    )
)]
pub async fn list_clients_handler(State(state): State<AppState>) -> impl IntoResponse {
    let service = state.service.lock().await;
    Json(service.list_clients().await)
}

#[utoipa::path(
    post,
    path = "/api/clients",
    request_body = Client,
    responses(
        (status = 201, description = "Client created", body = Client),
        (status = 400, description = "Invalid client or duplicate cedula", body = ErrorBody),
        (status = 422, description = "Malformed JSON body", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn create_client_handler(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> impl IntoResponse {
    let Json(raw) = match body {
        Ok(v) => v,
        Err(e) => return json_422(e, "a client object"),
    };
    let service = state.service.lock().await;
    match service.create_client(raw).await {
        Ok(client) => {
            state.notifier.broadcast("clients");
            (StatusCode::CREATED, Json(client)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    params(("id" = String, Path, description = "Client id")),
    request_body = Client,
    responses(
        (status = 200, description = "The updated client", body = Client),
        (status = 400, description = "Merged record invalid", body = ErrorBody),
        (status = 404, description = "Unknown client id", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn update_client_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> impl IntoResponse {
    let Json(patch) = match body {
        Ok(v) => v,
        Err(e) => return json_422(e, "partial client fields"),
    };
    let service = state.service.lock().await;
    match service.update_client(&id, patch).await {
        Ok(client) => {
            state.notifier.broadcast("clients");
            Json(client).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    params(("id" = String, Path, description = "Client id")),
    responses(
        (status = 200, description = "Client deleted", body = OkBody),
        (status = 404, description = "Unknown client id", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn delete_client_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let service = state.service.lock().await;
    match service.delete_client(&id).await {
        Ok(()) => {
            state.notifier.broadcast("clients");
            OkBody::ok().into_response()
        }
        Err(e) => e.into_response(),
    }
}
