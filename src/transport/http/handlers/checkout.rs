use crate::domain::model::Transaction;
use crate::transport::http::types::{json_422, AppState, ErrorBody};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value as JsonValue;

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = Transaction,
    responses(
        (status = 201, description = "Transaction recorded", body = Transaction),
        (status = 400, description = "Invalid transaction", body = ErrorBody),
        (status = 422, description = "Malformed JSON body", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn checkout_handler(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> impl IntoResponse {
    let Json(raw) = match body {
        Ok(v) => v,
        Err(e) => return json_422(e, "a transaction object"),
    };
    let service = state.service.lock().await;
    match service.checkout(raw).await {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/history",
    responses(
        (status = 200, description = "Every recorded transaction", body = Vec<Transaction>)
    )
)]
pub async fn history_handler(State(state): State<AppState>) -> impl IntoResponse {
    let service = state.service.lock().await;
    Json(service.history().await)
}
