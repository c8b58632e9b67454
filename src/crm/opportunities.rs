//! CRM opportunities.
//!
//! A sales opportunity against a contact: monetary value, win probability
//! (0-100), and a free-form pipeline stage. The assignee defaults to
//! whoever created the record.

use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::auth::handlers::OkResponse;
use crate::error::ApiError;
use crate::middleware::{AuthUser, Identity};
use crate::server::state::AppState;
use crate::store::{MemCollection, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub title: String,
    pub description: String,
    pub value: Option<f64>,
    pub probability: i32,
    pub stage: String,
    pub expected_close_date: Option<NaiveDate>,
    pub actual_close_date: Option<NaiveDate>,
    pub assigned_to: Uuid,
    pub source: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_probability() -> i32 {
    50
}

fn default_stage() -> String {
    "prospecting".to_string()
}

#[derive(Debug, Deserialize)]
pub struct NewOpportunity {
    pub contact_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default = "default_probability")]
    pub probability: i32,
    #[serde(default = "default_stage")]
    pub stage: String,
    #[serde(default)]
    pub expected_close_date: Option<NaiveDate>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Opportunity {
    pub fn create(input: NewOpportunity, assignee: &Identity) -> Opportunity {
        let now = Utc::now();
        Opportunity {
            id: Uuid::new_v4(),
            contact_id: input.contact_id,
            title: input.title,
            description: input.description,
            value: input.value,
            probability: input.probability,
            stage: input.stage,
            expected_close_date: input.expected_close_date,
            actual_close_date: None,
            assigned_to: assignee.id,
            source: input.source,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OpportunityPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub value: Option<f64>,
    pub probability: Option<i32>,
    pub stage: Option<String>,
    pub expected_close_date: Option<NaiveDate>,
    pub actual_close_date: Option<NaiveDate>,
    pub assigned_to: Option<Uuid>,
    pub source: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl OpportunityPatch {
    pub fn apply(self, opportunity: &mut Opportunity) {
        if let Some(title) = self.title {
            opportunity.title = title;
        }
        if let Some(description) = self.description {
            opportunity.description = description;
        }
        if self.value.is_some() {
            opportunity.value = self.value;
        }
        if let Some(probability) = self.probability {
            opportunity.probability = probability;
        }
        if let Some(stage) = self.stage {
            opportunity.stage = stage;
        }
        if self.expected_close_date.is_some() {
            opportunity.expected_close_date = self.expected_close_date;
        }
        if self.actual_close_date.is_some() {
            opportunity.actual_close_date = self.actual_close_date;
        }
        if let Some(assigned_to) = self.assigned_to {
            opportunity.assigned_to = assigned_to;
        }
        if let Some(source) = self.source {
            opportunity.source = source;
        }
        if let Some(tags) = self.tags {
            opportunity.tags = tags;
        }
        opportunity.updated_at = Utc::now();
    }
}

#[async_trait]
pub trait OpportunityStore: Send + Sync {
    async fn list(&self, contact_id: Option<Uuid>) -> Result<Vec<Opportunity>, StoreError>;

    async fn insert(&self, opportunity: Opportunity) -> Result<(), StoreError>;

    async fn update(&self, id: Uuid, patch: OpportunityPatch) -> Result<Opportunity, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

pub struct PgOpportunityStore {
    pool: PgPool,
}

impl PgOpportunityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const OPPORTUNITY_COLUMNS: &str = "id, contact_id, title, description, value, probability, stage, \
                                   expected_close_date, actual_close_date, assigned_to, source, \
                                   tags, created_at, updated_at";

fn opportunity_from_row(row: &sqlx::postgres::PgRow) -> Opportunity {
    Opportunity {
        id: row.get("id"),
        contact_id: row.get("contact_id"),
        title: row.get("title"),
        description: row.get("description"),
        value: row.get("value"),
        probability: row.get("probability"),
        stage: row.get("stage"),
        expected_close_date: row.get("expected_close_date"),
        actual_close_date: row.get("actual_close_date"),
        assigned_to: row.get("assigned_to"),
        source: row.get("source"),
        tags: row.get::<SqlJson<Vec<String>>, _>("tags").0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl OpportunityStore for PgOpportunityStore {
    async fn list(&self, contact_id: Option<Uuid>) -> Result<Vec<Opportunity>, StoreError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {OPPORTUNITY_COLUMNS} FROM crm_opportunities
            WHERE ($1::uuid IS NULL OR contact_id = $1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(contact_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(opportunity_from_row).collect())
    }

    async fn insert(&self, opportunity: Opportunity) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO crm_opportunities (id, contact_id, title, description, value, probability,
                                           stage, expected_close_date, actual_close_date,
                                           assigned_to, source, tags, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(opportunity.id)
        .bind(opportunity.contact_id)
        .bind(&opportunity.title)
        .bind(&opportunity.description)
        .bind(opportunity.value)
        .bind(opportunity.probability)
        .bind(&opportunity.stage)
        .bind(opportunity.expected_close_date)
        .bind(opportunity.actual_close_date)
        .bind(opportunity.assigned_to)
        .bind(&opportunity.source)
        .bind(SqlJson(&opportunity.tags))
        .bind(opportunity.created_at)
        .bind(opportunity.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: Uuid, patch: OpportunityPatch) -> Result<Opportunity, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {OPPORTUNITY_COLUMNS} FROM crm_opportunities WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        let mut opportunity = opportunity_from_row(&row);
        patch.apply(&mut opportunity);

        sqlx::query(
            r#"
            UPDATE crm_opportunities
            SET title = $2, description = $3, value = $4, probability = $5, stage = $6,
                expected_close_date = $7, actual_close_date = $8, assigned_to = $9,
                source = $10, tags = $11, updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&opportunity.title)
        .bind(&opportunity.description)
        .bind(opportunity.value)
        .bind(opportunity.probability)
        .bind(&opportunity.stage)
        .bind(opportunity.expected_close_date)
        .bind(opportunity.actual_close_date)
        .bind(opportunity.assigned_to)
        .bind(&opportunity.source)
        .bind(SqlJson(&opportunity.tags))
        .bind(opportunity.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(opportunity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM crm_opportunities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub struct MemOpportunityStore {
    opportunities: MemCollection<Opportunity>,
}

impl MemOpportunityStore {
    pub fn new() -> Self {
        Self {
            opportunities: MemCollection::new(),
        }
    }
}

impl Default for MemOpportunityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OpportunityStore for MemOpportunityStore {
    async fn list(&self, contact_id: Option<Uuid>) -> Result<Vec<Opportunity>, StoreError> {
        Ok(self
            .opportunities
            .all()
            .into_iter()
            .filter(|o| contact_id.is_none_or(|c| o.contact_id == c))
            .collect())
    }

    async fn insert(&self, opportunity: Opportunity) -> Result<(), StoreError> {
        self.opportunities.insert_first(opportunity);
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: OpportunityPatch) -> Result<Opportunity, StoreError> {
        self.opportunities
            .update_first(|o| o.id == id, |o| patch.apply(o))
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        if self.opportunities.remove_where(|o| o.id == id) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

// Handlers

#[derive(Debug, Deserialize)]
pub struct OpportunityQuery {
    pub contact_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct OpportunityList {
    pub opportunities: Vec<Opportunity>,
}

#[derive(Debug, Serialize)]
pub struct OpportunityBody {
    pub opportunity: Opportunity,
}

/// `GET /api/crm/opportunities`
pub async fn list_opportunities(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Query(query): Query<OpportunityQuery>,
) -> Result<Json<OpportunityList>, ApiError> {
    let opportunities = state.crm_opportunities.list(query.contact_id).await?;
    Ok(Json(OpportunityList { opportunities }))
}

/// `POST /api/crm/opportunities`
pub async fn create_opportunity(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(input): Json<NewOpportunity>,
) -> Result<Json<OpportunityBody>, ApiError> {
    let opportunity = Opportunity::create(input, &identity);
    state.crm_opportunities.insert(opportunity.clone()).await?;
    Ok(Json(OpportunityBody { opportunity }))
}

/// `PUT /api/crm/opportunities/{id}`
pub async fn update_opportunity(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<OpportunityPatch>,
) -> Result<Json<OpportunityBody>, ApiError> {
    let opportunity = state
        .crm_opportunities
        .update(id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, "Opportunity"))?;
    Ok(Json(OpportunityBody { opportunity }))
}

/// `DELETE /api/crm/opportunities/{id}`
pub async fn delete_opportunity(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .crm_opportunities
        .delete(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Opportunity"))?;
    Ok(Json(OkResponse { ok: true }))
}
