//! Contact submission store: one trait, two backends.

use async_trait::async_trait;
use sqlx::PgPool;

use super::ContactSubmission;
use crate::store::{MemCollection, StoreError};

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn insert(&self, submission: ContactSubmission) -> Result<(), StoreError>;
}

pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn insert(&self, submission: ContactSubmission) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO contact_submissions (id, name, email, firm, phone, comments, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(submission.id)
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.firm)
        .bind(&submission.phone)
        .bind(&submission.comments)
        .bind(submission.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

pub struct MemSubmissionStore {
    submissions: MemCollection<ContactSubmission>,
}

impl MemSubmissionStore {
    pub fn new() -> Self {
        Self {
            submissions: MemCollection::new(),
        }
    }
}

impl Default for MemSubmissionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionStore for MemSubmissionStore {
    async fn insert(&self, submission: ContactSubmission) -> Result<(), StoreError> {
        self.submissions.insert_first(submission);
        Ok(())
    }
}
