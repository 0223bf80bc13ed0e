// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route-level tests for the appointment API.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use taller_api::{ApiState, AuthConfig, HealthState, router};
use taller_core::{AppointmentStore, TemplateKind};
use taller_lifecycle::AppointmentController;
use taller_storage::MemoryStore;
use taller_test_utils::{FailingStore, MockGateway};

const TOKEN: &str = "admin-secret";

fn app_with(
    store: Arc<dyn AppointmentStore>,
    auth: AuthConfig,
) -> (Router, Arc<MockGateway>) {
    let gateway = Arc::new(MockGateway::new());
    let render: Arc<dyn Fn() -> String + Send + Sync> = Arc::new(|| "taller_up 1\n".to_string());
    let state = ApiState {
        controller: AppointmentController::new(store, gateway.clone()),
        auth,
        health: HealthState::new(Some(render)),
    };
    (router(state), gateway)
}

fn app() -> (Router, Arc<MockGateway>) {
    app_with(
        Arc::new(MemoryStore::with_samples()),
        AuthConfig::new(Some(TOKEN.to_string()), true),
    )
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("Authorization", format!("Bearer {t}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 65536).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn booking() -> Value {
    json!({
        "nombre": "Juan Perez",
        "telefono": "1122334455",
        "servicio": "Cambio de aceite",
        "fecha": "2025-04-10T10:00:00",
        "estado": "confirmado"
    })
}

#[tokio::test]
async fn booking_creates_pending_appointment_and_notifies() {
    let (app, gateway) = app();
    let (status, body) = send(&app, request("POST", "/api/turnos", None, Some(booking()))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 4);
    assert_eq!(body["estado"], "pendiente");
    assert_eq!(body["nombre"], "Juan Perez");
    assert_eq!(body["fecha"], "2025-04-10T10:00:00");

    let sent = gateway.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, TemplateKind::Confirmation);
}

#[tokio::test]
async fn booking_hides_delivery_failure() {
    let (app, gateway) = app();
    gateway.set_failure(Some("Error Telegram: Forbidden")).await;

    let (status, body) = send(&app, request("POST", "/api/turnos", None, Some(booking()))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("notificacion").is_none());
    assert_eq!(gateway.sent_count().await, 1);
}

#[tokio::test]
async fn booking_without_required_fields_is_rejected() {
    let (app, gateway) = app();
    let incomplete = json!({"nombre": "Ana", "telefono": "11"});
    let (status, body) = send(&app, request("POST", "/api/turnos", None, Some(incomplete))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Faltan datos obligatorios");
    assert_eq!(gateway.sent_count().await, 0);
}

#[tokio::test]
async fn booking_with_malformed_date_is_rejected() {
    let (app, _gateway) = app();
    let mut bad = booking();
    bad["fecha"] = json!("mañana");
    let (status, body) = send(&app, request("POST", "/api/turnos", None, Some(bad))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Faltan datos obligatorios");
}

#[tokio::test]
async fn store_failure_is_generic_500() {
    let (app, gateway) = app_with(Arc::new(FailingStore), AuthConfig::new(None, false));
    let (status, body) = send(&app, request("POST", "/api/turnos", None, Some(booking()))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error al procesar la solicitud");
    assert_eq!(gateway.sent_count().await, 0);

    let (status, _) = send(&app, request("GET", "/api/turnos", None, None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn admin_routes_require_token() {
    let (app, _gateway) = app();
    let (status, _) = send(&app, request("GET", "/api/turnos", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, request("GET", "/api/turnos", Some("wrong"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, request("POST", "/api/turnos/confirmar?id=1", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn production_without_token_fails_closed() {
    let (app, _gateway) = app_with(
        Arc::new(MemoryStore::with_samples()),
        AuthConfig::new(None, true),
    );
    let (status, _) = send(&app, request("GET", "/api/turnos", Some("anything"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The booking form stays public.
    let (status, _) = send(&app, request("POST", "/api/turnos", None, Some(booking()))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn development_without_token_is_open() {
    let (app, _gateway) = app_with(
        Arc::new(MemoryStore::with_samples()),
        AuthConfig::new(None, false),
    );
    let (status, body) = send(&app, request("GET", "/api/turnos", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn list_get_and_filter_by_date() {
    let (app, _gateway) = app();

    let (status, body) = send(&app, request("GET", "/api/turnos", Some(TOKEN), None)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let (status, body) = send(&app, request("GET", "/api/turnos?id=2", Some(TOKEN), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estado"], "pendiente");

    let (status, body) = send(
        &app,
        request("GET", "/api/turnos?fecha=2025-04-11", Some(TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], 3);

    let (status, body) = send(
        &app,
        request("GET", "/api/turnos?fecha=2025-05-01", Some(TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = send(&app, request("GET", "/api/turnos?fecha=ayer", Some(TOKEN), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Fecha inválida");
}

#[tokio::test]
async fn get_unknown_or_non_numeric_id_is_404() {
    let (app, _gateway) = app();
    for uri in ["/api/turnos?id=99", "/api/turnos?id=abc"] {
        let (status, body) = send(&app, request("GET", uri, Some(TOKEN), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "Turno no encontrado");
    }
}

#[tokio::test]
async fn confirm_returns_record_and_delivery() {
    let (app, gateway) = app();
    let (status, body) = send(
        &app,
        request("POST", "/api/turnos/confirmar?id=2", Some(TOKEN), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turno"]["estado"], "confirmado");
    assert_eq!(body["notificacion"]["success"], true);
    assert!(body["notificacion"]["messageId"].is_string());
    assert_eq!(gateway.sent().await[0].kind, TemplateKind::Confirmation);
}

#[tokio::test]
async fn confirm_unknown_id_sends_nothing() {
    let (app, gateway) = app();
    let (status, body) = send(
        &app,
        request("POST", "/api/turnos/confirmar?id=42", Some(TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Turno no encontrado");
    assert_eq!(gateway.sent_count().await, 0);
}

#[tokio::test]
async fn cancel_reports_failed_delivery_but_keeps_status() {
    let (app, gateway) = app();
    gateway.set_failure(Some("Error al enviar mensaje: Error desconocido")).await;

    let (status, body) = send(
        &app,
        request("POST", "/api/turnos/cancelar?id=1", Some(TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turno"]["estado"], "cancelado");
    assert_eq!(body["notificacion"]["success"], false);
    assert_eq!(
        body["notificacion"]["error"],
        "Error al enviar mensaje: Error desconocido"
    );

    let (_, stored) = send(&app, request("GET", "/api/turnos?id=1", Some(TOKEN), None)).await;
    assert_eq!(stored["estado"], "cancelado");
}

#[tokio::test]
async fn reminder_keeps_status() {
    let (app, gateway) = app();
    let (status, body) = send(
        &app,
        request("POST", "/api/turnos/recordatorio?id=2", Some(TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turno"]["estado"], "pendiente");
    assert_eq!(gateway.sent().await[0].kind, TemplateKind::Reminder);
}

#[tokio::test]
async fn action_without_id_is_400() {
    let (app, _gateway) = app();
    let (status, body) = send(
        &app,
        request("POST", "/api/turnos/recordatorio", Some(TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ID no proporcionado");
}

#[tokio::test]
async fn update_patches_without_notifying() {
    let (app, gateway) = app();
    let patch = json!({"estado": "confirmado", "notas": "Cliente llega tarde"});
    let (status, body) = send(
        &app,
        request("PUT", "/api/turnos?id=2", Some(TOKEN), Some(patch)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estado"], "confirmado");
    assert_eq!(body["notas"], "Cliente llega tarde");
    assert_eq!(gateway.sent_count().await, 0);
}

#[tokio::test]
async fn update_errors() {
    let (app, _gateway) = app();
    let patch = json!({"estado": "confirmado"});

    let (status, body) = send(
        &app,
        request("PUT", "/api/turnos", Some(TOKEN), Some(patch.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ID no proporcionado");

    let (status, _) = send(
        &app,
        request("PUT", "/api/turnos?id=50", Some(TOKEN), Some(patch)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let bad_status = json!({"estado": "archivado"});
    let (status, _) = send(
        &app,
        request("PUT", "/api/turnos?id=1", Some(TOKEN), Some(bad_status)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let reschedule = json!({"fecha": "2025-04-12T09:00:00"});
    let (status, _) = send(
        &app,
        request("PUT", "/api/turnos?id=1", Some(TOKEN), Some(reschedule)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_then_missing() {
    let (app, _gateway) = app();
    let (status, body) = send(&app, request("DELETE", "/api/turnos?id=3", Some(TOKEN), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = send(&app, request("DELETE", "/api/turnos?id=3", Some(TOKEN), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Turno no encontrado");

    let (status, _) = send(&app, request("DELETE", "/api/turnos", Some(TOKEN), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_is_public() {
    let (app, _gateway) = app();
    let (status, body) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "healthy");
    assert_eq!(body["channel"], "mock");
}

#[tokio::test]
async fn health_reports_unhealthy_store() {
    let (app, _gateway) = app_with(Arc::new(FailingStore), AuthConfig::new(None, false));
    let (status, body) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["store"], "unhealthy");
}

#[tokio::test]
async fn metrics_render_when_recorder_present() {
    let (app, _gateway) = app();
    let response = app
        .clone()
        .oneshot(request("GET", "/metrics", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], b"taller_up 1\n");
}
