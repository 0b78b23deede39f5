use crate::transport::http::types::{json_422, AppState, ErrorBody, RateBody, RateUpdateBody};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/rate",
    responses(
        (status = 200, description = "Current conversion rate", body = RateBody)
    )
)]
pub async fn get_rate_handler(State(state): State<AppState>) -> impl IntoResponse {
    let service = state.service.lock().await;
    Json(RateBody {
        rate: service.rate().await,
    })
}

#[utoipa::path(
    put,
    path = "/api/rate",
    request_body = RateUpdateBody,
    responses(
        (status = 200, description = "Rate updated", body = RateBody),
        (status = 400, description = "Non-positive or non-numeric rate", body = ErrorBody),
        (status = 422, description = "Malformed JSON body", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn set_rate_handler(
    State(state): State<AppState>,
    body: Result<Json<RateUpdateBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"rate\": 250.75}"),
    };
    let service = state.service.lock().await;
    match service.set_rate(&body.rate).await {
        Ok(rate) => {
            state.notifier.broadcast("rate");
            Json(RateBody { rate }).into_response()
        }
        Err(e) => e.into_response(),
    }
}
