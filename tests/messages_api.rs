//! Messaging fan-out, threads, and replies through the API.

mod common;

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use common::{login, send, test_app, ADMIN_EMAIL, CLIENT_EMAIL, EMPLOYEE_EMAIL};

#[tokio::test]
async fn group_send_fans_out_one_record_per_recipient() {
    let app = test_app();
    let (token, _) = login(&app, EMPLOYEE_EMAIL).await;

    let recipients = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    let (status, sent) = send(
        &app,
        Method::POST,
        "/api/messages",
        Some(&token),
        Some(json!({
            "subject": "Quarterly review",
            "body": "Draft attached",
            "recipients": recipients,
            "is_group": true,
            "group_name": "Review crew",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sent["group"]["name"], "Review crew");

    let (_, listed) = send(&app, Method::GET, "/api/messages", Some(&token), None).await;
    let messages = listed["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);

    let group_id = messages[0]["group_id"].as_str().unwrap();
    let thread_id = messages[0]["thread_id"].as_str().unwrap();
    let mut seen_recipients: Vec<&str> = Vec::new();
    for msg in messages {
        assert_eq!(msg["group_id"], group_id);
        assert_eq!(msg["thread_id"], thread_id);
        assert_eq!(msg["is_group"], true);
        let recipient = msg["recipient_id"].as_str().unwrap();
        assert!(!seen_recipients.contains(&recipient));
        seen_recipients.push(recipient);
    }
}

#[tokio::test]
async fn reply_to_direct_thread_goes_back_to_the_original_sender() {
    let app = test_app();
    let (admin_token, admin_user) = login(&app, ADMIN_EMAIL).await;
    let (client_token, client_user) = login(&app, CLIENT_EMAIL).await;

    // Admin opens a 1:1 thread with the client
    let (_, sent) = send(
        &app,
        Method::POST,
        "/api/messages",
        Some(&admin_token),
        Some(json!({
            "subject": "Kickoff",
            "body": "Can we meet?",
            "recipients": [client_user["id"]],
        })),
    )
    .await;
    let thread_id = sent["message"]["thread_id"].as_str().unwrap().to_string();

    // The client replies without naming recipients
    let (status, reply) = send(
        &app,
        Method::POST,
        &format!("/api/messages/{thread_id}/reply"),
        Some(&client_token),
        Some(json!({ "body": "Sure" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["message"]["recipient_id"], admin_user["id"]);
    assert_eq!(reply["message"]["thread_id"], thread_id.as_str());
    assert_eq!(reply["message"]["subject"], "Re: Kickoff");
}

#[tokio::test]
async fn reply_to_empty_thread_is_404() {
    let app = test_app();
    let (token, _) = login(&app, EMPLOYEE_EMAIL).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/messages/{}/reply", Uuid::new_v4()),
        Some(&token),
        Some(json!({ "body": "hello?" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Thread not found");
}

#[tokio::test]
async fn thread_filter_narrows_the_listing() {
    let app = test_app();
    let (token, _) = login(&app, EMPLOYEE_EMAIL).await;
    let recipient = Uuid::new_v4();

    let (_, first) = send(
        &app,
        Method::POST,
        "/api/messages",
        Some(&token),
        Some(json!({ "subject": "one", "recipients": [recipient] })),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/api/messages",
        Some(&token),
        Some(json!({ "subject": "two", "recipients": [recipient] })),
    )
    .await;

    let thread_id = first["message"]["thread_id"].as_str().unwrap();
    let (_, listed) = send(
        &app,
        Method::GET,
        &format!("/api/messages?thread_id={thread_id}"),
        Some(&token),
        None,
    )
    .await;
    let messages = listed["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["subject"], "one");
}

#[tokio::test]
async fn groups_listing_is_derived_from_group_messages() {
    let app = test_app();
    let (token, _) = login(&app, EMPLOYEE_EMAIL).await;
    let members = vec![Uuid::new_v4(), Uuid::new_v4()];

    send(
        &app,
        Method::POST,
        "/api/messages",
        Some(&token),
        Some(json!({
            "subject": "hello",
            "recipients": members,
            "is_group": true,
            "group_name": "Deal team",
        })),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/messages/groups", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let groups = body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["name"], "Deal team");
    assert_eq!(groups[0]["members"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn mark_read_flips_the_flag_and_404s_on_unknown_ids() {
    let app = test_app();
    let (token, _) = login(&app, EMPLOYEE_EMAIL).await;

    let (_, sent) = send(
        &app,
        Method::POST,
        "/api/messages",
        Some(&token),
        Some(json!({ "subject": "s", "recipients": [Uuid::new_v4()] })),
    )
    .await;
    assert_eq!(sent["message"]["read"], false);
    let id = sent["message"]["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/messages/{id}/read"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = send(&app, Method::GET, "/api/messages", Some(&token), None).await;
    assert_eq!(listed["messages"][0]["read"], true);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/messages/{}/read", Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
