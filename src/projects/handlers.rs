//! Project HTTP handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use super::{NewProject, Project, ProjectPatch};
use crate::auth::handlers::OkResponse;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProjectList {
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct ProjectBody {
    pub project: Project,
}

/// `GET /api/projects`
pub async fn list_projects(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<ProjectList>, ApiError> {
    let projects = state.projects.list().await?;
    Ok(Json(ProjectList { projects }))
}

/// `POST /api/projects`
///
/// The owner is stamped from the caller's verified identity.
pub async fn create_project(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(input): Json<NewProject>,
) -> Result<Json<ProjectBody>, ApiError> {
    let project = Project::create(input, &identity);
    state.projects.insert(project.clone()).await?;
    Ok(Json(ProjectBody { project }))
}

/// `PUT /api/projects/{id}`
pub async fn update_project(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProjectPatch>,
) -> Result<Json<ProjectBody>, ApiError> {
    let project = state
        .projects
        .update(id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, "Project"))?;
    Ok(Json(ProjectBody { project }))
}

/// `DELETE /api/projects/{id}`
pub async fn delete_project(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .projects
        .delete(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Project"))?;
    Ok(Json(OkResponse { ok: true }))
}
