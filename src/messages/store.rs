//! Message store: one trait, two backends.

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::Message;
use crate::store::{MemCollection, StoreError};

/// Optional list filters, straight from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageFilter {
    pub thread_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Messages the user is a party to, newest-first, optionally narrowed
    /// by thread or group.
    async fn list_for(
        &self,
        user: Uuid,
        filter: &MessageFilter,
    ) -> Result<Vec<Message>, StoreError>;

    /// Persist a fan-out batch. One statement per record, no transaction.
    async fn insert_all(&self, messages: &[Message]) -> Result<(), StoreError>;

    /// Any one message of the thread, used to recover reply routing.
    async fn find_in_thread(&self, thread_id: Uuid) -> Result<Option<Message>, StoreError>;

    /// Flip the read flag; `NotFound` when the id is absent.
    async fn mark_read(&self, id: Uuid) -> Result<(), StoreError>;
}

pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn message_from_row(row: &sqlx::postgres::PgRow) -> Message {
    Message {
        id: row.get("id"),
        sender_id: row.get("sender_id"),
        sender_name: row.get("sender_name"),
        recipient_id: row.get("recipient_id"),
        subject: row.get("subject"),
        body: row.get("body"),
        read: row.get("read"),
        is_group: row.get("is_group"),
        group_id: row.get("group_id"),
        group_name: row.get("group_name"),
        thread_id: row.get("thread_id"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn list_for(
        &self,
        user: Uuid,
        filter: &MessageFilter,
    ) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, sender_name, recipient_id, subject, body, read,
                   is_group, group_id, group_name, thread_id, created_at
            FROM messages
            WHERE (sender_id = $1 OR recipient_id = $1)
              AND ($2::uuid IS NULL OR thread_id = $2)
              AND ($3::uuid IS NULL OR group_id = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user)
        .bind(filter.thread_id)
        .bind(filter.group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(message_from_row).collect())
    }

    async fn insert_all(&self, messages: &[Message]) -> Result<(), StoreError> {
        for msg in messages {
            sqlx::query(
                r#"
                INSERT INTO messages (id, sender_id, sender_name, recipient_id, subject, body,
                                      read, is_group, group_id, group_name, thread_id, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(msg.id)
            .bind(msg.sender_id)
            .bind(&msg.sender_name)
            .bind(msg.recipient_id)
            .bind(&msg.subject)
            .bind(&msg.body)
            .bind(msg.read)
            .bind(msg.is_group)
            .bind(msg.group_id)
            .bind(&msg.group_name)
            .bind(msg.thread_id)
            .bind(msg.created_at)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn find_in_thread(&self, thread_id: Uuid) -> Result<Option<Message>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, sender_id, sender_name, recipient_id, subject, body, read,
                   is_group, group_id, group_name, thread_id, created_at
            FROM messages
            WHERE thread_id = $1
            LIMIT 1
            "#,
        )
        .bind(thread_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| message_from_row(&r)))
    }

    async fn mark_read(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE messages SET read = true WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub struct MemMessageStore {
    messages: MemCollection<Message>,
}

impl MemMessageStore {
    pub fn new() -> Self {
        Self {
            messages: MemCollection::new(),
        }
    }
}

impl Default for MemMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for MemMessageStore {
    async fn list_for(
        &self,
        user: Uuid,
        filter: &MessageFilter,
    ) -> Result<Vec<Message>, StoreError> {
        Ok(self
            .messages
            .all()
            .into_iter()
            .filter(|m| m.involves(user))
            .filter(|m| filter.thread_id.is_none_or(|t| m.thread_id == t))
            .filter(|m| filter.group_id.is_none_or(|g| m.group_id == Some(g)))
            .collect())
    }

    async fn insert_all(&self, messages: &[Message]) -> Result<(), StoreError> {
        for msg in messages {
            self.messages.insert_first(msg.clone());
        }
        Ok(())
    }

    async fn find_in_thread(&self, thread_id: Uuid) -> Result<Option<Message>, StoreError> {
        Ok(self.messages.find(|m| m.thread_id == thread_id))
    }

    async fn mark_read(&self, id: Uuid) -> Result<(), StoreError> {
        self.messages
            .update_first(|m| m.id == id, |m| m.read = true)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::users::Role;
    use crate::messages::{fan_out, OutgoingMessage};
    use crate::middleware::Identity;

    fn identity() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "alex@opsdesk.example".to_string(),
            role: Role::Employee,
        }
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_participants() {
        let store = MemMessageStore::new();
        let sender = identity();
        let recipient = Uuid::new_v4();
        let outsider = Uuid::new_v4();

        let batch = fan_out(
            &sender,
            &OutgoingMessage {
                subject: "s".to_string(),
                body: "b".to_string(),
                recipients: vec![recipient],
                is_group: false,
                group_name: None,
            },
        );
        store.insert_all(&batch).await.unwrap();

        let filter = MessageFilter::default();
        assert_eq!(store.list_for(sender.id, &filter).await.unwrap().len(), 1);
        assert_eq!(store.list_for(recipient, &filter).await.unwrap().len(), 1);
        assert!(store.list_for(outsider, &filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_thread_filter() {
        let store = MemMessageStore::new();
        let sender = identity();
        let recipient = Uuid::new_v4();
        let send = |subject: &str| OutgoingMessage {
            subject: subject.to_string(),
            body: String::new(),
            recipients: vec![recipient],
            is_group: false,
            group_name: None,
        };

        let first = fan_out(&sender, &send("one"));
        let second = fan_out(&sender, &send("two"));
        store.insert_all(&first).await.unwrap();
        store.insert_all(&second).await.unwrap();

        let filter = MessageFilter {
            thread_id: Some(first[0].thread_id),
            group_id: None,
        };
        let listed = store.list_for(sender.id, &filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].subject, "one");
    }

    #[tokio::test]
    async fn test_mark_read_missing_is_not_found() {
        let store = MemMessageStore::new();
        assert!(matches!(
            store.mark_read(Uuid::new_v4()).await,
            Err(StoreError::NotFound)
        ));
    }
}
