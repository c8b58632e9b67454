//! Assistant HTTP handlers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{knowledge, AiInteraction};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AiQuery {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct AiResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct AiHistory {
    pub history: Vec<AiInteraction>,
}

/// `POST /api/ai/query`
///
/// Answers from the static knowledge base and records the pair for the
/// caller (persistent backend only).
pub async fn query(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(request): Json<AiQuery>,
) -> Result<Json<AiResponse>, ApiError> {
    let response = knowledge::respond(&request.query);

    state
        .assistant
        .record(AiInteraction::new(
            identity.id,
            request.query,
            response.clone(),
        ))
        .await?;

    Ok(Json(AiResponse { response }))
}

/// `GET /api/ai/history`
///
/// The caller's 20 most recent interactions, newest-first; empty when no
/// persistent store is configured.
pub async fn history(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<AiHistory>, ApiError> {
    let history = state.assistant.history(identity.id).await?;
    Ok(Json(AiHistory { history }))
}
