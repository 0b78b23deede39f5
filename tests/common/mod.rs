#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tienda_server::transport;
use tienda_server::{BackupManager, ChangeNotifier, JsonStore, StoreService};
use tokio::sync::Mutex;

pub struct TestApp {
    pub base_url: String,
    pub state: transport::http::AppState,
    pub server: tokio::task::JoinHandle<()>,
}

/// Initializes a store under `data_dir` and serves the full router on an
/// ephemeral port.
pub async fn spawn_server(data_dir: &Path) -> TestApp {
    let store = JsonStore::new(data_dir.join("db.json"));
    let backups = BackupManager::new(data_dir.join("backups"));
    let service = StoreService::new(store, backups);
    service.initialize().await.expect("initialize store");

    let state = transport::http::AppState {
        service: Arc::new(Mutex::new(service)),
        notifier: Arc::new(ChangeNotifier::new()),
    };
    let router = transport::http::create_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        base_url: format!("http://{}", addr),
        state,
        server,
    }
}

/// Fresh app on its own temp directory.
pub async fn spawn_app() -> (TestApp, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let app = spawn_server(dir.path()).await;
    (app, dir)
}
