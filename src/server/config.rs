/**
 * Server Configuration
 *
 * Loads the optional PostgreSQL connection from the environment. The
 * presence of `DATABASE_URL` is what selects the persistent backend: the
 * pool is built lazily and connectivity is NOT probed here, so a present
 * but misconfigured URL still selects Postgres and the first real query
 * surfaces the failure.
 */

use sqlx::PgPool;

/// Database configuration result: the pool when `DATABASE_URL` is set,
/// `None` for the in-memory fallback.
pub type DatabaseConfig = Option<PgPool>;

/// Read `DATABASE_URL` and build a lazy connection pool.
///
/// When the pool is created, migrations are attempted best-effort; a
/// failure (e.g. the database is unreachable at boot) is logged and does
/// not change the backend selection.
pub async fn load_database() -> DatabaseConfig {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store");
            return None;
        }
    };

    let pool = match PgPool::connect_lazy(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Invalid DATABASE_URL: {:?}", e);
            tracing::warn!("Falling back to the in-memory store");
            return None;
        }
    };

    tracing::info!("Persistent store selected");

    match sqlx::migrate!("./migrations").run(&pool).await {
        Ok(_) => tracing::info!("Database migrations applied"),
        Err(e) => {
            // Deliberately not fatal: the backend stays Postgres and the
            // first query will surface any real connectivity problem.
            tracing::error!("Failed to run migrations: {:?}", e);
            tracing::warn!("Continuing without migrations");
        }
    }

    Some(pool)
}
