use crate::transport::http::handlers::{admin, checkout, clients, health, products, rate, stream};
use crate::transport::http::types::{
    error_response, AppState, BackupRequest, BackupResponse, ErrorBody, OkBody, RateBody,
    RateUpdateBody, RestoreRequest,
};
use crate::domain::model::{Categoria, Client, Estado, LineItem, MetodoPago, Product, Transaction};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        products::list_products_handler,
        products::create_product_handler,
        products::update_product_handler,
        products::delete_product_handler,
        clients::list_clients_handler,
        clients::create_client_handler,
        clients::update_client_handler,
        clients::delete_client_handler,
        rate::get_rate_handler,
        rate::set_rate_handler,
        checkout::checkout_handler,
        checkout::history_handler,
        admin::backup_handler,
        admin::restore_handler
    ),
    components(schemas(
        Product,
        Client,
        Transaction,
        LineItem,
        Categoria,
        MetodoPago,
        Estado,
        RateBody,
        RateUpdateBody,
        OkBody,
        ErrorBody,
        BackupRequest,
        BackupResponse,
        RestoreRequest
    ))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/products",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route(
            "/api/products/:id",
            put(products::update_product_handler).delete(products::delete_product_handler),
        )
        .route(
            "/api/clients",
            get(clients::list_clients_handler).post(clients::create_client_handler),
        )
        .route(
            "/api/clients/:id",
            put(clients::update_client_handler).delete(clients::delete_client_handler),
        )
        .route(
            "/api/rate",
            get(rate::get_rate_handler).put(rate::set_rate_handler),
        )
        .route("/api/checkout", post(checkout::checkout_handler))
        .route("/api/history", get(checkout::history_handler))
        .route("/api/stream", get(stream::stream_handler))
        .route("/admin/backup", post(admin::backup_handler))
        .route("/admin/restore", post(admin::restore_handler))
        .fallback(fallback_handler)
        .with_state(app_state)
}

async fn fallback_handler() -> impl IntoResponse {
    error_response(StatusCode::NOT_FOUND, "Endpoint no encontrado")
}
