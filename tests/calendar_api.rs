//! Calendar filtering and date derivation through the API.

mod common;

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{login, send, test_app, EMPLOYEE_EMAIL};

async fn create_event(app: &axum::Router, token: &str, title: &str, start: &str) -> serde_json::Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/calendar",
        Some(token),
        Some(json!({ "title": title, "start_time": start })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["event"].clone()
}

#[tokio::test]
async fn date_is_derived_from_start_time() {
    let app = test_app();
    let (token, user) = login(&app, EMPLOYEE_EMAIL).await;

    let event = create_event(&app, &token, "Sync", "2026-02-10T15:30:00Z").await;
    assert_eq!(event["date"], "2026-02-10");
    assert_eq!(event["owner_id"], user["id"]);
    assert_eq!(event["status"], "confirmed");
}

#[tokio::test]
async fn explicit_range_wins_over_month_and_year() {
    let app = test_app();
    let (token, _) = login(&app, EMPLOYEE_EMAIL).await;

    create_event(&app, &token, "January sync", "2026-01-15T10:00:00Z").await;
    create_event(&app, &token, "February sync", "2026-02-15T10:00:00Z").await;

    // Range covers only February while month/year points at January
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/calendar?start=2026-02-01&end=2026-02-28&month=1&year=2026",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "February sync");
}

#[tokio::test]
async fn month_filter_applies_when_no_range_is_given() {
    let app = test_app();
    let (token, _) = login(&app, EMPLOYEE_EMAIL).await;

    create_event(&app, &token, "January sync", "2026-01-15T10:00:00Z").await;
    create_event(&app, &token, "February sync", "2026-02-15T10:00:00Z").await;

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/calendar?month=1&year=2026",
        Some(&token),
        None,
    )
    .await;
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "January sync");
}

#[tokio::test]
async fn moving_the_start_time_moves_the_date() {
    let app = test_app();
    let (token, _) = login(&app, EMPLOYEE_EMAIL).await;

    let event = create_event(&app, &token, "Sync", "2026-02-10T15:30:00Z").await;
    let id = event["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/calendar/{id}"),
        Some(&token),
        Some(json!({ "start_time": "2026-03-01T09:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["date"], "2026-03-01");
    // Untouched fields survive the merge
    assert_eq!(body["event"]["title"], "Sync");
}

#[tokio::test]
async fn get_update_delete_unknown_event_is_404() {
    let app = test_app();
    let (token, _) = login(&app, EMPLOYEE_EMAIL).await;
    let ghost = format!("/api/calendar/{}", uuid::Uuid::new_v4());

    let (status, _) = send(&app, Method::GET, &ghost, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        &ghost,
        Some(&token),
        Some(json!({ "title": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &ghost, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
