use crate::domain::model::Product;
use crate::transport::http::types::{json_422, AppState, ErrorBody, OkBody};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value as JsonValue;

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Every product, in display order", body = Vec<Product>)
    )
)]
pub async fn list_products_handler(State(state): State<AppState>) -> impl IntoResponse {
    let service = state.service.lock().await;
    Json(service.list_products().await)
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = Product,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid product", body = ErrorBody),
        (status = 422, description = "Malformed JSON body", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> impl IntoResponse {
    let Json(raw) = match body {
        Ok(v) => v,
        Err(e) => return json_422(e, "a product object"),
    };
    let service = state.service.lock().await;
    match service.create_product(raw).await {
        Ok(product) => {
            state.notifier.broadcast("products");
            (StatusCode::CREATED, Json(product)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    request_body = Product,
    responses(
        (status = 200, description = "Product updated", body = OkBody),
        (status = 400, description = "Merged record invalid", body = ErrorBody),
        (status = 404, description = "Unknown product id", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> impl IntoResponse {
    let Json(patch) = match body {
        Ok(v) => v,
        Err(e) => return json_422(e, "partial product fields"),
    };
    let service = state.service.lock().await;
    match service.update_product(&id, patch).await {
        Ok(_) => {
            state.notifier.broadcast("products");
            OkBody::ok().into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = OkBody),
        (status = 404, description = "Unknown product id", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let service = state.service.lock().await;
    match service.delete_product(&id).await {
        Ok(()) => {
            state.notifier.broadcast("products");
            OkBody::ok().into_response()
        }
        Err(e) => e.into_response(),
    }
}
