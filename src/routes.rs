/**
 * Route Configuration
 *
 * Assembles the full `/api` route table and the cross-cutting layers:
 * CORS, request tracing, and a 2 MB body limit.
 *
 * # Routes
 *
 * Public: health probe, register/login, contact form, meeting requests.
 * Everything else requires `Authorization: Bearer <token>`; protection is
 * enforced by the `AuthUser` extractor in each handler.
 */

use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::state::AppState;
use crate::{assistant, auth, calendar, contracts, crm, documents, messages, outreach, projects, tasks};

/// Request bodies over 2 MB are rejected.
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Build the application router with all routes and layers.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Health
        .route("/health", get(health))
        // Auth
        .route("/auth/register", post(auth::handlers::register))
        .route("/auth/login", post(auth::handlers::login))
        .route("/auth/profile", get(auth::handlers::profile))
        // Projects
        .route(
            "/projects",
            get(projects::handlers::list_projects).post(projects::handlers::create_project),
        )
        .route(
            "/projects/{id}",
            put(projects::handlers::update_project).delete(projects::handlers::delete_project),
        )
        // Messages
        .route(
            "/messages",
            get(messages::handlers::list_messages).post(messages::handlers::send_message),
        )
        .route("/messages/groups", get(messages::handlers::list_groups))
        .route("/messages/{id}/read", put(messages::handlers::mark_message_read))
        .route("/messages/{id}/reply", post(messages::handlers::reply_to_thread))
        // Calendar
        .route(
            "/calendar",
            get(calendar::handlers::list_events).post(calendar::handlers::create_event),
        )
        .route(
            "/calendar/{id}",
            get(calendar::handlers::get_event)
                .put(calendar::handlers::update_event)
                .delete(calendar::handlers::delete_event),
        )
        // Contracts
        .route(
            "/contracts",
            get(contracts::handlers::list_contracts).post(contracts::handlers::create_contract),
        )
        .route(
            "/contracts/{id}",
            put(contracts::handlers::update_contract).delete(contracts::handlers::delete_contract),
        )
        // Tasks
        .route(
            "/tasks",
            get(tasks::handlers::list_tasks).post(tasks::handlers::create_task),
        )
        .route(
            "/tasks/{id}",
            put(tasks::handlers::update_task).delete(tasks::handlers::delete_task),
        )
        // Documents
        .route(
            "/documents",
            get(documents::handlers::list_documents).post(documents::handlers::create_document),
        )
        .route(
            "/documents/{id}",
            get(documents::handlers::get_document)
                .put(documents::handlers::update_document)
                .delete(documents::handlers::delete_document),
        )
        // CRM
        .route(
            "/crm/contacts",
            get(crm::contacts::list_contacts).post(crm::contacts::create_contact),
        )
        .route(
            "/crm/contacts/{id}",
            put(crm::contacts::update_contact).delete(crm::contacts::delete_contact),
        )
        .route(
            "/crm/interactions",
            get(crm::interactions::list_interactions).post(crm::interactions::create_interaction),
        )
        .route(
            "/crm/interactions/{id}",
            put(crm::interactions::update_interaction)
                .delete(crm::interactions::delete_interaction),
        )
        .route(
            "/crm/opportunities",
            get(crm::opportunities::list_opportunities)
                .post(crm::opportunities::create_opportunity),
        )
        .route(
            "/crm/opportunities/{id}",
            put(crm::opportunities::update_opportunity)
                .delete(crm::opportunities::delete_opportunity),
        )
        // Public outreach
        .route("/contact", post(outreach::handlers::submit_contact))
        .route(
            "/meeting-request",
            post(outreach::handlers::submit_meeting_request),
        )
        // Assistant
        .route("/ai/query", post(assistant::handlers::query))
        .route("/ai/history", get(assistant::handlers::history));

    Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    let origin = std::env::var("CORS_ORIGIN")
        .ok()
        .and_then(|o| o.parse::<HeaderValue>().ok())
        .unwrap_or_else(|| HeaderValue::from_static("http://localhost:3000"));

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}

/// `GET /api/health`
///
/// Unauthenticated liveness probe.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ok": true,
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime": state.started_at.elapsed().as_secs(),
        "environment": std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
    }))
}

async fn not_found() -> crate::error::ApiError {
    crate::error::ApiError::NotFound("Route")
}
