//! CRM contacts.

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
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
pub struct CrmContact {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub industry: Option<String>,
    pub source: Option<String>,
    pub status: String,
    pub tags: Vec<String>,
    pub notes: String,
    pub linkedin_url: String,
    pub website: String,
    pub address: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_contact_status() -> String {
    "active".to_string()
}

#[derive(Debug, Deserialize)]
pub struct NewCrmContact {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default = "default_contact_status")]
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub address: String,
}

impl CrmContact {
    pub fn create(input: NewCrmContact, creator: &Identity) -> CrmContact {
        let now = Utc::now();
        CrmContact {
            id: Uuid::new_v4(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            company: input.company,
            title: input.title,
            industry: input.industry,
            source: input.source,
            status: input.status,
            tags: input.tags,
            notes: input.notes,
            linkedin_url: input.linkedin_url,
            website: input.website,
            address: input.address,
            created_by: creator.id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CrmContactPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub industry: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    pub linkedin_url: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

impl CrmContactPatch {
    pub fn apply(self, contact: &mut CrmContact) {
        if self.first_name.is_some() {
            contact.first_name = self.first_name;
        }
        if self.last_name.is_some() {
            contact.last_name = self.last_name;
        }
        if self.email.is_some() {
            contact.email = self.email;
        }
        if self.phone.is_some() {
            contact.phone = self.phone;
        }
        if self.company.is_some() {
            contact.company = self.company;
        }
        if self.title.is_some() {
            contact.title = self.title;
        }
        if self.industry.is_some() {
            contact.industry = self.industry;
        }
        if self.source.is_some() {
            contact.source = self.source;
        }
        if let Some(status) = self.status {
            contact.status = status;
        }
        if let Some(tags) = self.tags {
            contact.tags = tags;
        }
        if let Some(notes) = self.notes {
            contact.notes = notes;
        }
        if let Some(linkedin_url) = self.linkedin_url {
            contact.linkedin_url = linkedin_url;
        }
        if let Some(website) = self.website {
            contact.website = website;
        }
        if let Some(address) = self.address {
            contact.address = address;
        }
        contact.updated_at = Utc::now();
    }
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn list(&self) -> Result<Vec<CrmContact>, StoreError>;

    async fn insert(&self, contact: CrmContact) -> Result<(), StoreError>;

    async fn update(&self, id: Uuid, patch: CrmContactPatch) -> Result<CrmContact, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

pub struct PgContactStore {
    pool: PgPool,
}

impl PgContactStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CONTACT_COLUMNS: &str = "id, first_name, last_name, email, phone, company, title, industry, \
                               source, status, tags, notes, linkedin_url, website, address, \
                               created_by, created_at, updated_at";

fn contact_from_row(row: &sqlx::postgres::PgRow) -> CrmContact {
    CrmContact {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        company: row.get("company"),
        title: row.get("title"),
        industry: row.get("industry"),
        source: row.get("source"),
        status: row.get("status"),
        tags: row.get::<SqlJson<Vec<String>>, _>("tags").0,
        notes: row.get("notes"),
        linkedin_url: row.get("linkedin_url"),
        website: row.get("website"),
        address: row.get("address"),
        created_by: row.get("created_by"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn list(&self) -> Result<Vec<CrmContact>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM crm_contacts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(contact_from_row).collect())
    }

    async fn insert(&self, contact: CrmContact) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO crm_contacts (id, first_name, last_name, email, phone, company, title,
                                      industry, source, status, tags, notes, linkedin_url,
                                      website, address, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(contact.id)
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.company)
        .bind(&contact.title)
        .bind(&contact.industry)
        .bind(&contact.source)
        .bind(&contact.status)
        .bind(SqlJson(&contact.tags))
        .bind(&contact.notes)
        .bind(&contact.linkedin_url)
        .bind(&contact.website)
        .bind(&contact.address)
        .bind(contact.created_by)
        .bind(contact.created_at)
        .bind(contact.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: Uuid, patch: CrmContactPatch) -> Result<CrmContact, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM crm_contacts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        let mut contact = contact_from_row(&row);
        patch.apply(&mut contact);

        sqlx::query(
            r#"
            UPDATE crm_contacts
            SET first_name = $2, last_name = $3, email = $4, phone = $5, company = $6,
                title = $7, industry = $8, source = $9, status = $10, tags = $11, notes = $12,
                linkedin_url = $13, website = $14, address = $15, updated_at = $16
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.company)
        .bind(&contact.title)
        .bind(&contact.industry)
        .bind(&contact.source)
        .bind(&contact.status)
        .bind(SqlJson(&contact.tags))
        .bind(&contact.notes)
        .bind(&contact.linkedin_url)
        .bind(&contact.website)
        .bind(&contact.address)
        .bind(contact.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM crm_contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub struct MemContactStore {
    contacts: MemCollection<CrmContact>,
}

impl MemContactStore {
    pub fn new() -> Self {
        Self {
            contacts: MemCollection::new(),
        }
    }
}

impl Default for MemContactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactStore for MemContactStore {
    async fn list(&self) -> Result<Vec<CrmContact>, StoreError> {
        Ok(self.contacts.all())
    }

    async fn insert(&self, contact: CrmContact) -> Result<(), StoreError> {
        self.contacts.insert_first(contact);
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: CrmContactPatch) -> Result<CrmContact, StoreError> {
        self.contacts
            .update_first(|c| c.id == id, |c| patch.apply(c))
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        if self.contacts.remove_where(|c| c.id == id) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

// Handlers

#[derive(Debug, Serialize)]
pub struct ContactList {
    pub contacts: Vec<CrmContact>,
}

#[derive(Debug, Serialize)]
pub struct ContactBody {
    pub contact: CrmContact,
}

/// `GET /api/crm/contacts`
pub async fn list_contacts(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<ContactList>, ApiError> {
    let contacts = state.crm_contacts.list().await?;
    Ok(Json(ContactList { contacts }))
}

/// `POST /api/crm/contacts`
pub async fn create_contact(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(input): Json<NewCrmContact>,
) -> Result<Json<ContactBody>, ApiError> {
    let contact = CrmContact::create(input, &identity);
    state.crm_contacts.insert(contact.clone()).await?;
    Ok(Json(ContactBody { contact }))
}

/// `PUT /api/crm/contacts/{id}`
pub async fn update_contact(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<CrmContactPatch>,
) -> Result<Json<ContactBody>, ApiError> {
    let contact = state
        .crm_contacts
        .update(id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, "Contact"))?;
    Ok(Json(ContactBody { contact }))
}

/// `DELETE /api/crm/contacts/{id}`
pub async fn delete_contact(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .crm_contacts
        .delete(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Contact"))?;
    Ok(Json(OkResponse { ok: true }))
}
