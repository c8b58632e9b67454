//! Outreach HTTP handlers. Both endpoints are public.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::{ContactSubmission, MeetingRequest, NewSubmission};
use crate::error::ApiError;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub ok: bool,
    /// Set when the write succeeded but the notification did not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// `POST /api/contact`
///
/// Persists the submission, then notifies the team. The write is never
/// rolled back for a notification failure; the failure is logged and
/// surfaced as a warning beside `ok: true`.
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(input): Json<NewSubmission>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let submission = ContactSubmission::create(input);
    state.submissions.insert(submission.clone()).await?;

    let warning = match state.mailer.send_contact_notice(&submission).await {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!("Contact notification failed: {}", e);
            Some("Submission saved but the notification email failed".to_string())
        }
    };

    Ok(Json(SubmissionResponse { ok: true, warning }))
}

/// `POST /api/meeting-request`
///
/// Notification only; nothing is persisted, so a failed send fails the
/// request.
pub async fn submit_meeting_request(
    State(state): State<AppState>,
    Json(request): Json<MeetingRequest>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    state
        .mailer
        .send_meeting_notice(&request)
        .await
        .map_err(|e| {
            tracing::error!("Meeting request notification failed: {}", e);
            ApiError::Misconfigured("Failed to process meeting request")
        })?;

    Ok(Json(SubmissionResponse {
        ok: true,
        warning: None,
    }))
}
