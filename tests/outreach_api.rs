//! Public outreach endpoints: contact submissions and meeting requests.

mod common;

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{send, test_app};

#[tokio::test]
async fn contact_submission_succeeds_with_a_warning_when_mail_is_down() {
    // The test app's mailer is disabled, so the write lands but the
    // notification cannot; the caller still gets ok:true plus a warning.
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/contact",
        None,
        Some(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "firm": "Doe Capital",
            "comments": "Please get in touch",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert!(body["warning"].is_string());
}

#[tokio::test]
async fn contact_form_requires_no_auth() {
    let app = test_app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/contact",
        None,
        Some(json!({ "name": "Anon", "email": "anon@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn meeting_request_fails_when_nothing_can_be_sent() {
    // No persistence backs meeting requests; if the notification cannot go
    // out the request has accomplished nothing and fails.
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/meeting-request",
        None,
        Some(json!({
            "advisors": ["alex"],
            "name": "Jane Doe",
            "email": "jane@example.com",
            "selected_times": ["2026-09-01T17:00:00Z"],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_routes_get_a_json_404() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}
