//! CRM interactions.
//!
//! An interaction is a logged touchpoint against a contact: a call, an
//! email, a meeting. It can link back to a message, a calendar event, or a
//! project, and carries an open key-value metadata map. Listing orders by
//! occurrence time, not creation time.

use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json as SqlJson;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::auth::handlers::OkResponse;
use crate::error::ApiError;
use crate::middleware::{AuthUser, Identity};
use crate::server::state::AppState;
use crate::store::{MemCollection, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub direction: String,
    pub email_message_id: Option<String>,
    pub calendar_event_id: Option<String>,
    pub project_id: Option<Uuid>,
    /// Open key-value bag; stored as-is in the jsonb column
    pub metadata: Map<String, Value>,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

fn default_direction() -> String {
    "outbound".to_string()
}

#[derive(Debug, Deserialize)]
pub struct NewInteraction {
    pub contact_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default = "default_direction")]
    pub direction: String,
    #[serde(default)]
    pub email_message_id: Option<String>,
    #[serde(default)]
    pub calendar_event_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// When the touchpoint happened; defaults to now
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl Interaction {
    pub fn create(input: NewInteraction, user: &Identity) -> Interaction {
        let now = Utc::now();
        Interaction {
            id: Uuid::new_v4(),
            contact_id: input.contact_id,
            user_id: user.id,
            kind: input.kind,
            subject: input.subject,
            content: input.content,
            direction: input.direction,
            email_message_id: input.email_message_id,
            calendar_event_id: input.calendar_event_id,
            project_id: input.project_id,
            metadata: input.metadata,
            occurred_at: input.occurred_at.unwrap_or(now),
            created_at: now,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InteractionPatch {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub direction: Option<String>,
    pub metadata: Option<Map<String, Value>>,
    pub occurred_at: Option<DateTime<Utc>>,
}

impl InteractionPatch {
    pub fn apply(self, interaction: &mut Interaction) {
        if let Some(kind) = self.kind {
            interaction.kind = kind;
        }
        if self.subject.is_some() {
            interaction.subject = self.subject;
        }
        if self.content.is_some() {
            interaction.content = self.content;
        }
        if let Some(direction) = self.direction {
            interaction.direction = direction;
        }
        if let Some(metadata) = self.metadata {
            interaction.metadata = metadata;
        }
        if let Some(occurred_at) = self.occurred_at {
            interaction.occurred_at = occurred_at;
        }
    }
}

#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Interactions ordered by occurrence time (newest-first), optionally
    /// narrowed to one contact.
    async fn list(&self, contact_id: Option<Uuid>) -> Result<Vec<Interaction>, StoreError>;

    async fn insert(&self, interaction: Interaction) -> Result<(), StoreError>;

    async fn update(&self, id: Uuid, patch: InteractionPatch) -> Result<Interaction, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

pub struct PgInteractionStore {
    pool: PgPool,
}

impl PgInteractionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const INTERACTION_COLUMNS: &str = "id, contact_id, user_id, type, subject, content, direction, \
                                   email_message_id, calendar_event_id, project_id, metadata, \
                                   occurred_at, created_at";

fn interaction_from_row(row: &sqlx::postgres::PgRow) -> Interaction {
    Interaction {
        id: row.get("id"),
        contact_id: row.get("contact_id"),
        user_id: row.get("user_id"),
        kind: row.get("type"),
        subject: row.get("subject"),
        content: row.get("content"),
        direction: row.get("direction"),
        email_message_id: row.get("email_message_id"),
        calendar_event_id: row.get("calendar_event_id"),
        project_id: row.get("project_id"),
        metadata: row.get::<SqlJson<Map<String, Value>>, _>("metadata").0,
        occurred_at: row.get("occurred_at"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl InteractionStore for PgInteractionStore {
    async fn list(&self, contact_id: Option<Uuid>) -> Result<Vec<Interaction>, StoreError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {INTERACTION_COLUMNS} FROM crm_interactions
            WHERE ($1::uuid IS NULL OR contact_id = $1)
            ORDER BY occurred_at DESC
            "#
        ))
        .bind(contact_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(interaction_from_row).collect())
    }

    async fn insert(&self, interaction: Interaction) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO crm_interactions (id, contact_id, user_id, type, subject, content,
                                          direction, email_message_id, calendar_event_id,
                                          project_id, metadata, occurred_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(interaction.id)
        .bind(interaction.contact_id)
        .bind(interaction.user_id)
        .bind(&interaction.kind)
        .bind(&interaction.subject)
        .bind(&interaction.content)
        .bind(&interaction.direction)
        .bind(&interaction.email_message_id)
        .bind(&interaction.calendar_event_id)
        .bind(interaction.project_id)
        .bind(SqlJson(&interaction.metadata))
        .bind(interaction.occurred_at)
        .bind(interaction.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: Uuid, patch: InteractionPatch) -> Result<Interaction, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {INTERACTION_COLUMNS} FROM crm_interactions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        let mut interaction = interaction_from_row(&row);
        patch.apply(&mut interaction);

        sqlx::query(
            r#"
            UPDATE crm_interactions
            SET type = $2, subject = $3, content = $4, direction = $5, metadata = $6,
                occurred_at = $7
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&interaction.kind)
        .bind(&interaction.subject)
        .bind(&interaction.content)
        .bind(&interaction.direction)
        .bind(SqlJson(&interaction.metadata))
        .bind(interaction.occurred_at)
        .execute(&self.pool)
        .await?;

        Ok(interaction)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM crm_interactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub struct MemInteractionStore {
    interactions: MemCollection<Interaction>,
}

impl MemInteractionStore {
    pub fn new() -> Self {
        Self {
            interactions: MemCollection::new(),
        }
    }
}

impl Default for MemInteractionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InteractionStore for MemInteractionStore {
    async fn list(&self, contact_id: Option<Uuid>) -> Result<Vec<Interaction>, StoreError> {
        let mut interactions: Vec<Interaction> = self
            .interactions
            .all()
            .into_iter()
            .filter(|i| contact_id.is_none_or(|c| i.contact_id == c))
            .collect();
        interactions.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(interactions)
    }

    async fn insert(&self, interaction: Interaction) -> Result<(), StoreError> {
        self.interactions.insert_first(interaction);
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: InteractionPatch) -> Result<Interaction, StoreError> {
        self.interactions
            .update_first(|i| i.id == id, |i| patch.apply(i))
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        if self.interactions.remove_where(|i| i.id == id) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

// Handlers

#[derive(Debug, Deserialize)]
pub struct InteractionQuery {
    pub contact_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct InteractionList {
    pub interactions: Vec<Interaction>,
}

#[derive(Debug, Serialize)]
pub struct InteractionBody {
    pub interaction: Interaction,
}

/// `GET /api/crm/interactions`
pub async fn list_interactions(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Query(query): Query<InteractionQuery>,
) -> Result<Json<InteractionList>, ApiError> {
    let interactions = state.crm_interactions.list(query.contact_id).await?;
    Ok(Json(InteractionList { interactions }))
}

/// `POST /api/crm/interactions`
pub async fn create_interaction(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(input): Json<NewInteraction>,
) -> Result<Json<InteractionBody>, ApiError> {
    let interaction = Interaction::create(input, &identity);
    state.crm_interactions.insert(interaction.clone()).await?;
    Ok(Json(InteractionBody { interaction }))
}

/// `PUT /api/crm/interactions/{id}`
pub async fn update_interaction(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<InteractionPatch>,
) -> Result<Json<InteractionBody>, ApiError> {
    let interaction = state
        .crm_interactions
        .update(id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, "Interaction"))?;
    Ok(Json(InteractionBody { interaction }))
}

/// `DELETE /api/crm/interactions/{id}`
pub async fn delete_interaction(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .crm_interactions
        .delete(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Interaction"))?;
    Ok(Json(OkResponse { ok: true }))
}
