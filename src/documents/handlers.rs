//! Document HTTP handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use super::{Document, DocumentPatch, NewDocument};
use crate::auth::handlers::OkResponse;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct DocumentList {
    pub documents: Vec<Document>,
}

#[derive(Debug, Serialize)]
pub struct DocumentBody {
    pub document: Document,
}

/// `GET /api/documents`
pub async fn list_documents(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<DocumentList>, ApiError> {
    let documents = state.documents.list().await?;
    Ok(Json(DocumentList { documents }))
}

/// `GET /api/documents/{id}`
pub async fn get_document(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentBody>, ApiError> {
    let document = state
        .documents
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("Document"))?;
    Ok(Json(DocumentBody { document }))
}

/// `POST /api/documents`
///
/// Registers a document record; the uploader is stamped from the caller.
pub async fn create_document(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(input): Json<NewDocument>,
) -> Result<Json<DocumentBody>, ApiError> {
    let document = Document::create(input, &identity);
    state.documents.insert(document.clone()).await?;
    Ok(Json(DocumentBody { document }))
}

/// `PUT /api/documents/{id}`
pub async fn update_document(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<DocumentPatch>,
) -> Result<Json<DocumentBody>, ApiError> {
    let document = state
        .documents
        .update(id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, "Document"))?;
    Ok(Json(DocumentBody { document }))
}

/// `DELETE /api/documents/{id}`
pub async fn delete_document(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .documents
        .delete(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Document"))?;
    Ok(Json(OkResponse { ok: true }))
}
