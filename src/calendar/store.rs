//! Calendar event store: one trait, two backends.
//!
//! Date filtering happens above the store (both backends return the full
//! list, the handler applies the filter), so the range-over-month
//! precedence rule lives in exactly one place.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{CalendarEvent, EventMeta, EventPatch};
use crate::store::{MemCollection, StoreError};

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list(&self) -> Result<Vec<CalendarEvent>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<CalendarEvent>, StoreError>;

    async fn insert(&self, event: CalendarEvent) -> Result<(), StoreError>;

    async fn update(&self, id: Uuid, patch: EventPatch) -> Result<CalendarEvent, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const EVENT_COLUMNS: &str =
    "id, title, date, attendees, owner_id, owner_name, created_at, updated_at, metadata";

fn event_from_row(row: &sqlx::postgres::PgRow) -> CalendarEvent {
    CalendarEvent {
        id: row.get("id"),
        title: row.get("title"),
        date: row.get("date"),
        attendees: row.get::<Json<Vec<String>>, _>("attendees").0,
        owner_id: row.get("owner_id"),
        owner_name: row.get("owner_name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        meta: row.get::<Json<EventMeta>, _>("metadata").0,
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn list(&self) -> Result<Vec<CalendarEvent>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(event_from_row).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<CalendarEvent>, StoreError> {
        let row = sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| event_from_row(&r)))
    }

    async fn insert(&self, event: CalendarEvent) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO events (id, title, date, attendees, owner_id, owner_name,
                                created_at, updated_at, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(event.date)
        .bind(Json(&event.attendees))
        .bind(event.owner_id)
        .bind(&event.owner_name)
        .bind(event.created_at)
        .bind(event.updated_at)
        .bind(Json(&event.meta))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: Uuid, patch: EventPatch) -> Result<CalendarEvent, StoreError> {
        let row = sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        let mut event = event_from_row(&row);
        patch.apply(&mut event);

        sqlx::query(
            r#"
            UPDATE events
            SET title = $2, date = $3, attendees = $4, updated_at = $5, metadata = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&event.title)
        .bind(event.date)
        .bind(Json(&event.attendees))
        .bind(event.updated_at)
        .bind(Json(&event.meta))
        .execute(&self.pool)
        .await?;

        Ok(event)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub struct MemEventStore {
    events: MemCollection<CalendarEvent>,
}

impl MemEventStore {
    pub fn new() -> Self {
        Self {
            events: MemCollection::new(),
        }
    }
}

impl Default for MemEventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for MemEventStore {
    async fn list(&self) -> Result<Vec<CalendarEvent>, StoreError> {
        Ok(self.events.all())
    }

    async fn get(&self, id: Uuid) -> Result<Option<CalendarEvent>, StoreError> {
        Ok(self.events.find(|e| e.id == id))
    }

    async fn insert(&self, event: CalendarEvent) -> Result<(), StoreError> {
        self.events.insert_first(event);
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: EventPatch) -> Result<CalendarEvent, StoreError> {
        self.events
            .update_first(|e| e.id == id, |e| patch.apply(e))
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        if self.events.remove_where(|e| e.id == id) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}
