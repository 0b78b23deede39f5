use std::sync::Arc;
use tienda_server::infra::config;
use tienda_server::transport;
use tienda_server::{BackupManager, ChangeNotifier, JsonStore, StoreService};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tienda_server=info,tower_http=info".into()),
        )
        .init();

    let store = JsonStore::new(config::db_file());
    let backups = BackupManager::new(config::backup_dir());
    let service = StoreService::new(store, backups);
    // A store that cannot even be initialized is the one fatal error.
    service.initialize().await?;
    info!(
        db = %config::db_file().display(),
        backups = %config::backup_dir().display(),
        "database initialized"
    );

    let notifier = Arc::new(ChangeNotifier::new());
    let app_state = transport::http::AppState {
        service: Arc::new(Mutex::new(service)),
        notifier,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()),
        )
        .layer(cors);

    let addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "API server listening");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}
