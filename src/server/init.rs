/**
 * Server Initialization
 *
 * Builds the application: loads the optional database, chooses the storage
 * backend exactly once, and assembles the router.
 */

use axum::Router;

use crate::notify::Mailer;
use crate::routes::create_router;
use crate::server::config::load_database;
use crate::server::state::AppState;

/// Create the Axum application.
///
/// The backend decision happens here, once per process: a configured
/// `DATABASE_URL` selects the PostgreSQL stores, anything else selects the
/// in-memory stores with the demo roster.
pub async fn create_app() -> Router {
    tracing::info!("Initializing opsdesk backend");

    let mailer = Mailer::from_env();

    let state = match load_database().await {
        Some(pool) => AppState::postgres(pool, mailer),
        None => {
            tracing::warn!("Running on the in-memory store; data will not survive a restart");
            AppState::in_memory(mailer)
        }
    };

    create_router(state)
}
