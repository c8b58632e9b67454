//! Assistant interaction store.
//!
//! History only exists on the persistent backend. The in-memory backend
//! records nothing and always reports an empty history.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::AiInteraction;
use crate::store::StoreError;

/// Most recent interactions returned by the history endpoint.
pub const HISTORY_LIMIT: i64 = 20;

#[async_trait]
pub trait AssistantStore: Send + Sync {
    /// Record a query/response pair for a user.
    async fn record(&self, interaction: AiInteraction) -> Result<(), StoreError>;

    /// The caller's most recent interactions, newest-first, capped at
    /// [`HISTORY_LIMIT`].
    async fn history(&self, user_id: Uuid) -> Result<Vec<AiInteraction>, StoreError>;
}

pub struct PgAssistantStore {
    pool: PgPool,
}

impl PgAssistantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssistantStore for PgAssistantStore {
    async fn record(&self, interaction: AiInteraction) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO ai_interactions (id, user_id, query, response, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(interaction.id)
        .bind(interaction.user_id)
        .bind(&interaction.query)
        .bind(&interaction.response)
        .bind(interaction.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn history(&self, user_id: Uuid) -> Result<Vec<AiInteraction>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, query, response, created_at
            FROM ai_interactions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(HISTORY_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| AiInteraction {
                id: row.get("id"),
                user_id: row.get("user_id"),
                query: row.get("query"),
                response: row.get("response"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

/// No-op store for the in-memory backend.
pub struct MemAssistantStore;

#[async_trait]
impl AssistantStore for MemAssistantStore {
    async fn record(&self, _interaction: AiInteraction) -> Result<(), StoreError> {
        Ok(())
    }

    async fn history(&self, _user_id: Uuid) -> Result<Vec<AiInteraction>, StoreError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_keeps_no_history() {
        let store = MemAssistantStore;
        let user = Uuid::new_v4();

        store
            .record(AiInteraction::new(
                user,
                "q".to_string(),
                "r".to_string(),
            ))
            .await
            .unwrap();

        assert!(store.history(user).await.unwrap().is_empty());
    }
}
