//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use stockroom_api::config::{LogFormat, ServerConfig};
use stockroom_api::router::build_app_router;
use stockroom_api::state::AppState;
use stockroom_ledger::{Ledger, LedgerConfig, LedgerContext};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        log_format: LogFormat::Pretty,
    }
}

/// Build the full application router over `pool`, with the same middleware
/// stack `main.rs` uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let ledger = Ledger::new(LedgerContext::new(pool.clone(), LedgerConfig::default()));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ledger,
    };
    build_app_router(state, &config)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response.into_body()).await)
}

/// Collect a response body as JSON, or `Value::Null` when empty.
pub async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn post_empty(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::POST, uri, None).await
}

pub async fn patch_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

/// Create a collective master with `quantity` units in stock and return its
/// management number.
pub async fn seed_collective(app: &Router, quantity: i32) -> String {
    let (status, master) = post_json(
        app,
        "/api/v1/masters",
        json!({
            "name": "Soldering iron",
            "management_category_id": 2,
            "genre_id": 4,
            "manufacturer": "Hakko",
            "model": "FX-888D"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{master}");
    let number = master["management_number"].as_str().unwrap().to_string();

    let (status, stock) = post_json(
        app,
        &format!("/api/v1/masters/{number}/stock"),
        json!({ "quantity": quantity, "owner": "lab", "default_location": "shelf B" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{stock}");
    number
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
