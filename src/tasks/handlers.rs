//! Task HTTP handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use super::{NewTask, Task, TaskPatch};
use crate::auth::handlers::OkResponse;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct TaskBody {
    pub task: Task,
}

/// `GET /api/tasks`
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<TaskList>, ApiError> {
    let tasks = state.tasks.list().await?;
    Ok(Json(TaskList { tasks }))
}

/// `POST /api/tasks`
///
/// The creator is stamped from the caller's verified identity.
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(input): Json<NewTask>,
) -> Result<Json<TaskBody>, ApiError> {
    let task = Task::create(input, &identity);
    state.tasks.insert(task.clone()).await?;
    Ok(Json(TaskBody { task }))
}

/// `PUT /api/tasks/{id}`
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<TaskBody>, ApiError> {
    let task = state
        .tasks
        .update(id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, "Task"))?;
    Ok(Json(TaskBody { task }))
}

/// `DELETE /api/tasks/{id}`
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .tasks
        .delete(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Task"))?;
    Ok(Json(OkResponse { ok: true }))
}
