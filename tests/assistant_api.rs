//! Assistant endpoints over the in-memory backend.

mod common;

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{login, send, test_app, CLIENT_EMAIL};

#[tokio::test]
async fn query_answers_from_the_knowledge_base() {
    let app = test_app();
    let (token, _) = login(&app, CLIENT_EMAIL).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/ai/query",
        Some(&token),
        Some(json!({ "query": "What should I know about private equity?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["response"].as_str().unwrap().contains("Buyout"));
}

#[tokio::test]
async fn history_stays_empty_without_a_persistent_store() {
    let app = test_app();
    let (token, _) = login(&app, CLIENT_EMAIL).await;

    send(
        &app,
        Method::POST,
        "/api/ai/query",
        Some(&token),
        Some(json!({ "query": "real estate outlook" })),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/ai/history", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history"], json!([]));
}

#[tokio::test]
async fn assistant_routes_are_protected() {
    let app = test_app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/ai/query",
        None,
        Some(json!({ "query": "anything" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/ai/history", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
