//! Full CRUD pass over the REST surface: the product lifecycle, client
//! uniqueness, the rate guard and checkout history, all against a real
//! server on an ephemeral port.

mod common;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

fn parse_ts(raw: &Value) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw.as_str().expect("timestamp string"))
        .expect("RFC3339 timestamp")
        .with_timezone(&Utc)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn product_crud_lifecycle() {
    let (app, _dir) = common::spawn_app().await;
    let client = reqwest::Client::new();

    // Create assigns an id and both timestamps.
    let created: Value = client
        .post(format!("{}/api/products", app.base_url))
        .json(&json!({ "nombre": "Mouse", "precio": 15, "categoria": "accesorios" }))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert!(id.starts_with('p'));
    let fecha_creacion = parse_ts(&created["fechaCreacion"]);
    parse_ts(&created["ultimaActualizacion"]);

    // It shows up in the listing.
    let listed: Value = client
        .get(format!("{}/api/products", app.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["nombre"], "Mouse");
    assert_eq!(listed[0]["precio"], 15.0);

    // Update merges and restamps ultimaActualizacion.
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let updated = client
        .put(format!("{}/api/products/{}", app.base_url, id))
        .json(&json!({ "precio": 20 }))
        .send()
        .await
        .unwrap();
    assert_eq!(updated.status(), 200);
    assert_eq!(updated.json::<Value>().await.unwrap(), json!({ "ok": true }));

    let listed: Value = client
        .get(format!("{}/api/products", app.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed[0]["precio"], 20.0);
    assert_eq!(listed[0]["nombre"], "Mouse");
    assert!(parse_ts(&listed[0]["ultimaActualizacion"]) > fecha_creacion);
    assert_eq!(parse_ts(&listed[0]["fechaCreacion"]), fecha_creacion);

    // Delete removes it.
    let deleted = client
        .delete(format!("{}/api/products/{}", app.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 200);
    let listed: Value = client
        .get(format!("{}/api/products", app.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unknown_ids_return_404_and_leave_collections_untouched() {
    let (app, _dir) = common::spawn_app().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/api/products", app.base_url))
        .json(&json!({ "nombre": "Mouse", "precio": 15 }))
        .send()
        .await
        .unwrap();
    let before = client
        .get(format!("{}/api/products", app.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    let put = client
        .put(format!("{}/api/products/ghost", app.base_url))
        .json(&json!({ "precio": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(put.status(), 404);
    assert_eq!(
        put.json::<Value>().await.unwrap()["error"],
        "Producto no encontrado"
    );

    let delete = client
        .delete(format!("{}/api/products/ghost", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(delete.status(), 404);

    let after = client
        .get(format!("{}/api/products", app.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(before, after);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn invalid_records_are_rejected_before_persistence() {
    let (app, _dir) = common::spawn_app().await;
    let client = reqwest::Client::new();

    for bad in [
        json!({ "precio": 15 }),
        json!({ "nombre": "Mouse", "precio": -1 }),
        json!({ "nombre": "Mouse", "precio": 5, "categoria": "juguetes" }),
        json!({ "nombre": "Mouse", "precio": 5, "DISPONIBLE": -3 }),
    ] {
        let resp = client
            .post(format!("{}/api/products", app.base_url))
            .json(&bad)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "payload: {}", bad);
        assert!(resp.json::<Value>().await.unwrap()["error"].is_string());
    }

    let listed: Value = client
        .get(format!("{}/api/products", app.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.as_array().unwrap().is_empty());

    // A body that is not JSON at all is a 422, not a 500.
    let resp = client
        .post(format!("{}/api/products", app.base_url))
        .header("content-type", "application/json")
        .body("not json at all")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn duplicate_cedula_conflicts_and_changes_nothing() {
    let (app, _dir) = common::spawn_app().await;
    let client = reqwest::Client::new();

    let ana = client
        .post(format!("{}/api/clients", app.base_url))
        .json(&json!({ "nombre": "Ana", "cedula": "V-12345678", "email": "ana@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(ana.status(), 201);
    let ana: Value = ana.json().await.unwrap();
    assert!(ana["id"].as_str().unwrap().starts_with("client_"));
    assert!(ana["fechaRegistro"].is_string());

    let before = client
        .get(format!("{}/api/clients", app.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    let dup = client
        .post(format!("{}/api/clients", app.base_url))
        .json(&json!({ "nombre": "Luis", "cedula": "V-12345678" }))
        .send()
        .await
        .unwrap();
    assert_eq!(dup.status(), 400);
    assert_eq!(
        dup.json::<Value>().await.unwrap()["error"],
        "Ya existe un cliente con esta cédula"
    );

    let after = client
        .get(format!("{}/api/clients", app.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(before, after);

    // Update returns the merged client and skips the cedula re-check.
    let id = ana["id"].as_str().unwrap();
    let updated: Value = client
        .put(format!("{}/api/clients/{}", app.base_url, id))
        .json(&json!({ "telefono": "0414-5551234" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["telefono"], "0414-5551234");
    assert_eq!(updated["nombre"], "Ana");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rate_guard_and_round_trip() {
    let (app, _dir) = common::spawn_app().await;
    let client = reqwest::Client::new();

    let initial: Value = client
        .get(format!("{}/api/rate", app.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(initial["rate"], 216.38);

    for bad in [json!(0), json!(-5), json!("mucho")] {
        let resp = client
            .put(format!("{}/api/rate", app.base_url))
            .json(&json!({ "rate": bad }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "rate: {}", bad);
        let current: Value = client
            .get(format!("{}/api/rate", app.base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(current["rate"], 216.38);
    }

    let set: Value = client
        .put(format!("{}/api/rate", app.base_url))
        .json(&json!({ "rate": 250.75 }))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(set["rate"], 250.75);

    let current: Value = client
        .get(format!("{}/api/rate", app.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current["rate"], 250.75);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn checkout_generates_txn_id_and_feeds_history() {
    let (app, _dir) = common::spawn_app().await;
    let client = reqwest::Client::new();

    let created = client
        .post(format!("{}/api/checkout", app.base_url))
        .json(&json!({ "clienteId": "c1", "productos": [], "total": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), 201);
    let created: Value = created.json().await.unwrap();

    let id = created["id"].as_str().unwrap();
    let suffix = id.strip_prefix("TXN-").expect("TXN- prefix");
    assert_eq!(suffix.len(), 8);
    assert!(suffix
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    parse_ts(&created["fecha"]);

    let history: Value = client
        .get(format!("{}/api/history", app.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["id"], *id);

    // A transaction without a client is rejected.
    let bad = client
        .post(format!("{}/api/checkout", app.base_url))
        .json(&json!({ "productos": [], "total": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status(), 400);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unknown_routes_and_health() {
    let (app, _dir) = common::spawn_app().await;
    let client = reqwest::Client::new();

    let missing = client
        .get(format!("{}/api/no-such-thing", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
    assert_eq!(
        missing.json::<Value>().await.unwrap()["error"],
        "Endpoint no encontrado"
    );

    let health = client
        .get(format!("{}/health", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(health.status(), 200);
    assert_eq!(health.json::<Value>().await.unwrap()["status"], "ok");
}
