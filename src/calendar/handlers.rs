//! Calendar HTTP handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use super::{CalendarEvent, EventFilter, EventPatch, NewEvent};
use crate::auth::handlers::OkResponse;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct EventList {
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Serialize)]
pub struct EventBody {
    pub event: CalendarEvent,
}

/// `GET /api/calendar`
///
/// Events filtered by `start`/`end` range when both are supplied, otherwise
/// by `month`/`year` when both are supplied, otherwise unfiltered.
pub async fn list_events(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Query(filter): Query<EventFilter>,
) -> Result<Json<EventList>, ApiError> {
    let events = state
        .events
        .list()
        .await?
        .into_iter()
        .filter(|e| filter.matches(e.date))
        .collect();
    Ok(Json(EventList { events }))
}

/// `GET /api/calendar/{id}`
pub async fn get_event(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EventBody>, ApiError> {
    let event = state
        .events
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("Event"))?;
    Ok(Json(EventBody { event }))
}

/// `POST /api/calendar`
pub async fn create_event(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(input): Json<NewEvent>,
) -> Result<Json<EventBody>, ApiError> {
    let event = CalendarEvent::create(input, &identity);
    state.events.insert(event.clone()).await?;
    Ok(Json(EventBody { event }))
}

/// `PUT /api/calendar/{id}`
pub async fn update_event(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<EventPatch>,
) -> Result<Json<EventBody>, ApiError> {
    let event = state
        .events
        .update(id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, "Event"))?;
    Ok(Json(EventBody { event }))
}

/// `DELETE /api/calendar/{id}`
pub async fn delete_event(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .events
        .delete(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Event"))?;
    Ok(Json(OkResponse { ok: true }))
}
