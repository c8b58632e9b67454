//! Messaging HTTP handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use super::store::MessageFilter;
use super::{fan_out, fan_out_reply, fold_groups, Message, MessageGroup, OutgoingMessage, ReplyMessage};
use crate::auth::handlers::OkResponse;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct MessageList {
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct GroupList {
    pub groups: Vec<MessageGroup>,
}

/// Summary of a freshly created group conversation.
#[derive(Debug, Serialize)]
pub struct GroupSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub members: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SentMessage {
    /// The first record of the fan-out, mirroring the send request
    pub message: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupSummary>,
}

/// `GET /api/messages`
///
/// Messages the caller is a party to, newest-first, optionally filtered by
/// `thread_id` or `group_id`.
pub async fn list_messages(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Query(filter): Query<MessageFilter>,
) -> Result<Json<MessageList>, ApiError> {
    let messages = state.messages.list_for(identity.id, &filter).await?;
    Ok(Json(MessageList { messages }))
}

/// `GET /api/messages/groups`
///
/// Group conversations derived from the caller's stored group messages.
pub async fn list_groups(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<GroupList>, ApiError> {
    let messages = state
        .messages
        .list_for(identity.id, &MessageFilter::default())
        .await?;
    Ok(Json(GroupList {
        groups: fold_groups(identity.id, &messages),
    }))
}

/// `POST /api/messages`
///
/// Sends a message. Group sends fan out into one record per recipient
/// sharing a new group id and thread id; the fan-out is one insert per
/// record with no transactional wrapping.
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(outgoing): Json<OutgoingMessage>,
) -> Result<Json<SentMessage>, ApiError> {
    let messages = fan_out(&identity, &outgoing);
    state.messages.insert_all(&messages).await?;

    let first = messages[0].clone();
    let group = first.group_id.map(|id| GroupSummary {
        id,
        name: first.group_name.clone(),
        members: outgoing.recipients.clone(),
    });

    Ok(Json(SentMessage {
        message: first,
        group,
    }))
}

/// `POST /api/messages/{thread_id}/reply`
///
/// Replies into an existing thread; 404 when the thread has no messages.
pub async fn reply_to_thread(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(thread_id): Path<Uuid>,
    Json(reply): Json<ReplyMessage>,
) -> Result<Json<SentMessage>, ApiError> {
    let original = state
        .messages
        .find_in_thread(thread_id)
        .await?
        .ok_or(ApiError::NotFound("Thread"))?;

    let messages = fan_out_reply(&identity, &original, &reply);
    if messages.is_empty() {
        // Group reply with no recipients supplied: nothing to store
        return Err(ApiError::BadRequest("No recipients for reply".to_string()));
    }
    state.messages.insert_all(&messages).await?;

    Ok(Json(SentMessage {
        message: messages[0].clone(),
        group: None,
    }))
}

/// `PUT /api/messages/{id}/read`
pub async fn mark_message_read(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .messages
        .mark_read(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Message"))?;
    Ok(Json(OkResponse { ok: true }))
}
