//! Restart behavior over the same database file:
//! 1) Start a server, write data through the API, stop it.
//! 2) Start a fresh server on the same directory and check the data
//!    survived the startup migration intact.
//! 3) Hand-corrupt one record and check the next startup drops only it.
//! Also drives the snapshot/restore admin surface end to end.

mod common;

use serde_json::{json, Value};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn data_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let client = reqwest::Client::new();

    // --- Phase A: seed data ---
    let app_a = common::spawn_server(dir.path()).await;
    let product: Value = client
        .post(format!("{}/api/products", app_a.base_url))
        .json(&json!({ "nombre": "Teclado", "precio": 45.5, "categoria": "accesorios" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    client
        .post(format!("{}/api/clients", app_a.base_url))
        .json(&json!({ "nombre": "Ana", "cedula": "V-1" }))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();
    client
        .put(format!("{}/api/rate", app_a.base_url))
        .json(&json!({ "rate": 250.75 }))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    app_a.server.abort();
    let _ = app_a.server.await;

    // --- Phase B: fresh server, same directory ---
    let app_b = common::spawn_server(dir.path()).await;
    let products: Value = client
        .get(format!("{}/api/products", app_b.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(products.as_array().unwrap().len(), 1);
    assert_eq!(products[0]["id"], product["id"]);
    assert_eq!(products[0]["nombre"], "Teclado");

    let clients: Value = client
        .get(format!("{}/api/clients", app_b.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(clients.as_array().unwrap().len(), 1);

    let rate: Value = client
        .get(format!("{}/api/rate", app_b.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rate["rate"], 250.75);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn startup_migration_drops_only_the_invalid_records() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("db.json"),
        serde_json::to_string_pretty(&json!({
            "version": "1.0.0",
            "products": [
                { "id": "p1", "nombre": "Mouse", "precio": 15 },
                { "id": "p2", "precio": 9 },
                { "id": "p3", "nombre": "Cable", "precio": -2 }
            ],
            "clients": [{ "id": "c1", "nombre": "Ana", "cedula": "V-1" }],
            "rate": 300.0
        }))
        .unwrap(),
    )
    .unwrap();

    let app = common::spawn_server(dir.path()).await;
    let client = reqwest::Client::new();

    let products: Value = client
        .get(format!("{}/api/products", app.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let products = products.as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"], "p1");
    // Migration backfilled the timestamps the original file never had.
    assert!(products[0]["fechaCreacion"].is_string());
    assert!(products[0]["ultimaActualizacion"].is_string());

    let rate: Value = client
        .get(format!("{}/api/rate", app.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rate["rate"], 300.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn snapshot_and_restore_round_trip_over_http() {
    let (app, _dir) = common::spawn_app().await;
    let client = reqwest::Client::new();

    client
        .put(format!("{}/api/rate", app.base_url))
        .json(&json!({ "rate": 300.0 }))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    let backup: Value = client
        .post(format!("{}/admin/backup", app.base_url))
        .json(&json!({ "reason": "pre_change" }))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(backup["ok"], true);
    let file = backup["file"].as_str().unwrap().to_string();
    assert!(file.starts_with("db_backup_pre_change_"));

    client
        .put(format!("{}/api/rate", app.base_url))
        .json(&json!({ "rate": 999.0 }))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    // Restore refuses to run without the confirm switch.
    let unconfirmed = client
        .post(format!("{}/admin/restore", app.base_url))
        .json(&json!({ "file": file }))
        .send()
        .await
        .unwrap();
    assert_eq!(unconfirmed.status(), 400);

    let restored = client
        .post(format!("{}/admin/restore", app.base_url))
        .json(&json!({ "file": file, "confirm": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(restored.status(), 200);

    let rate: Value = client
        .get(format!("{}/api/rate", app.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rate["rate"], 300.0);

    // Unknown snapshots are a 404, traversal attempts a 400.
    let missing = client
        .post(format!("{}/admin/restore", app.base_url))
        .json(&json!({ "file": "db_backup_nope.json", "confirm": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);

    let traversal = client
        .post(format!("{}/admin/restore", app.base_url))
        .json(&json!({ "file": "../db.json", "confirm": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(traversal.status(), 400);
}
