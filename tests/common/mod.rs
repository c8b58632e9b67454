//! Shared test helpers: build the app on the in-memory backend and drive
//! it with plain `tower` service calls.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use opsdesk::notify::Mailer;
use opsdesk::routes::create_router;
use opsdesk::server::state::AppState;

/// The demo roster password (see `auth::users`).
pub const DEMO_PASSWORD: &str = "Password123!";

pub const ADMIN_EMAIL: &str = "admin@opsdesk.example";
pub const EMPLOYEE_EMAIL: &str = "alex@opsdesk.example";
pub const CLIENT_EMAIL: &str = "client@example.com";

/// App on the in-memory backend with notifications disabled.
pub fn test_app() -> Router {
    create_router(AppState::in_memory(Mailer::disabled()))
}

/// Send one request and decode the JSON body (Null when empty).
pub async fn send(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

/// Log a demo user in; returns (token, user body).
pub async fn login(app: &Router, email: &str) -> (String, Value) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "email": email, "password": DEMO_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");

    let token = body["token"].as_str().expect("token in response").to_string();
    (token, body["user"].clone())
}
