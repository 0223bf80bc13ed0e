// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the assembled service.
//!
//! Each test loads a configuration, opens a temp SQLite store, builds the
//! configured gateway and drives the HTTP API. Tests are independent and
//! order-insensitive.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use taller_api::{ApiState, AuthConfig, HealthState, router};
use taller_config::{TallerConfig, load_and_validate_str};
use taller_core::{AppointmentStore, NotificationGateway, PluginAdapter};
use taller_lifecycle::AppointmentController;
use taller_storage::SqliteStore;
use taller_whatsapp::WhatsAppGateway;

const TOKEN: &str = "e2e-token";

struct Harness {
    app: Router,
    store: Arc<SqliteStore>,
    _dir: TempDir,
}

fn production_config(dir: &TempDir) -> TallerConfig {
    let toml = format!(
        r#"
[app]
environment = "production"

[messaging]
channel = "whatsapp"

[storage]
database_path = "{}"

[server]
admin_token = "{TOKEN}"
"#,
        dir.path().join("taller.db").display()
    );
    load_and_validate_str(&toml).expect("e2e config should be valid")
}

async fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let config = production_config(&dir);

    let store = Arc::new(SqliteStore::open(config.storage.clone()).await.unwrap());
    // No credentials are configured, so sends are simulated even in production.
    let gateway =
        WhatsAppGateway::new(&config.whatsapp, &config.messaging, config.is_production()).unwrap();
    assert!(gateway.is_simulated());

    let controller = AppointmentController::new(store.clone(), Arc::new(gateway));
    let state = ApiState {
        controller,
        auth: AuthConfig::new(config.server.admin_token.clone(), config.is_production()),
        health: HealthState::new(None),
    };

    Harness {
        app: router(state),
        store,
        _dir: dir,
    }
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {TOKEN}"));
    let request = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            builder.body(Body::from(json.to_string())).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 65536).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn booking_to_confirmation_round_trip() {
    let h = harness().await;

    let (status, created) = call(
        &h.app,
        "POST",
        "/api/turnos",
        Some(json!({
            "nombre": "Juan Perez",
            "telefono": "11 2345 6789",
            "servicio": "Cambio de aceite",
            "fecha": "2025-04-10T10:00",
            "notas": ""
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["estado"], "pendiente");
    assert!(created.get("notas").is_none());
    assert!(created["created_at"].is_string());

    let (status, outcome) = call(&h.app, "POST", "/api/turnos/confirmar?id=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["turno"]["estado"], "confirmado");
    assert_eq!(outcome["notificacion"]["success"], true);
    assert!(
        outcome["notificacion"]["messageId"]
            .as_str()
            .unwrap()
            .starts_with("dev_msg_")
    );

    let stored = h
        .store
        .get(taller_core::AppointmentId(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, taller_core::AppointmentStatus::Confirmed);
}

#[tokio::test]
async fn agenda_by_day_from_sqlite() {
    let h = harness().await;
    for (nombre, fecha) in [
        ("Ana", "2025-04-11T09:00"),
        ("Beto", "2025-04-10T14:30"),
        ("Caro", "2025-04-10T08:15"),
    ] {
        let (status, _) = call(
            &h.app,
            "POST",
            "/api/turnos",
            Some(json!({
                "nombre": nombre,
                "telefono": "1122334455",
                "servicio": "Revisión general",
                "fecha": fecha
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = call(&h.app, "GET", "/api/turnos", None).await;
    let names: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["nombre"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Caro", "Beto", "Ana"]);

    let (_, day) = call(&h.app, "GET", "/api/turnos?fecha=2025-04-10", None).await;
    let names: Vec<&str> = day
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["nombre"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Caro", "Beto"]);
}

#[tokio::test]
async fn update_cancel_and_delete() {
    let h = harness().await;
    let (_, created) = call(
        &h.app,
        "POST",
        "/api/turnos",
        Some(json!({
            "nombre": "María López",
            "telefono": "11 9876 5432",
            "servicio": "Alineación y balanceo",
            "fecha": "2025-04-10 14:30"
        })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = call(
        &h.app,
        "PUT",
        &format!("/api/turnos?id={id}"),
        Some(json!({"servicio": "Cambio de frenos"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["servicio"], "Cambio de frenos");
    assert_eq!(updated["estado"], "pendiente");

    let (status, outcome) = call(&h.app, "POST", &format!("/api/turnos/cancelar?id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["turno"]["estado"], "cancelado");

    let (status, _) = call(&h.app, "DELETE", &format!("/api/turnos?id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&h.app, "GET", &format!("/api/turnos?id={id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_degraded_gateway_without_credentials() {
    let h = harness().await;
    let (status, body) = call(&h.app, "GET", "/health", None).await;
    // A simulating notifier degrades the report but keeps the service up.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["store"], "healthy");
    assert_eq!(body["notifier"], "degraded");
    assert_eq!(body["channel"], "whatsapp");
}

#[tokio::test]
async fn store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = production_config(&dir);
    let gateway = Arc::new(
        WhatsAppGateway::new(&config.whatsapp, &config.messaging, true).unwrap(),
    );

    {
        let store = Arc::new(SqliteStore::open(config.storage.clone()).await.unwrap());
        let controller = AppointmentController::new(store.clone(), gateway.clone());
        let request = serde_json::from_value(json!({
            "nombre": "Carlos Rodríguez",
            "telefono": "11 5555 8888",
            "servicio": "Diagnóstico por falla",
            "fecha": "2025-04-11T09:00:00"
        }))
        .unwrap();
        controller.create(request).await.unwrap();
        store.shutdown().await.unwrap();
        assert_eq!(gateway.channel(), "whatsapp");
    }

    let reopened = SqliteStore::open(config.storage.clone()).await.unwrap();
    let all = reopened.list().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].customer_name, "Carlos Rodríguez");
}
