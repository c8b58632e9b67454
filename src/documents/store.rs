//! Document store: one trait, two backends.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{Document, DocumentPatch};
use crate::store::{MemCollection, StoreError};

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Document>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Document>, StoreError>;

    async fn insert(&self, document: Document) -> Result<(), StoreError>;

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> Result<Document, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const DOCUMENT_COLUMNS: &str = "id, filename, original_filename, file_size, mime_type, category, \
                                description, storage_path, uploaded_by, access_level, tags, \
                                confidential, project_id, created_at, updated_at";

fn document_from_row(row: &sqlx::postgres::PgRow) -> Document {
    Document {
        id: row.get("id"),
        filename: row.get("filename"),
        original_filename: row.get("original_filename"),
        file_size: row.get("file_size"),
        mime_type: row.get("mime_type"),
        category: row.get("category"),
        description: row.get("description"),
        storage_path: row.get("storage_path"),
        uploaded_by: row.get("uploaded_by"),
        access_level: row.get("access_level"),
        tags: row.get::<Json<Vec<String>>, _>("tags").0,
        confidential: row.get("confidential"),
        project_id: row.get("project_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list(&self) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(document_from_row).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| document_from_row(&r)))
    }

    async fn insert(&self, document: Document) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (id, filename, original_filename, file_size, mime_type,
                                   category, description, storage_path, uploaded_by, access_level,
                                   tags, confidential, project_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(document.id)
        .bind(&document.filename)
        .bind(&document.original_filename)
        .bind(document.file_size)
        .bind(&document.mime_type)
        .bind(&document.category)
        .bind(&document.description)
        .bind(&document.storage_path)
        .bind(document.uploaded_by)
        .bind(&document.access_level)
        .bind(Json(&document.tags))
        .bind(document.confidential)
        .bind(document.project_id)
        .bind(document.created_at)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> Result<Document, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        let mut document = document_from_row(&row);
        patch.apply(&mut document);

        sqlx::query(
            r#"
            UPDATE documents
            SET category = $2, description = $3, access_level = $4, tags = $5,
                confidential = $6, project_id = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&document.category)
        .bind(&document.description)
        .bind(&document.access_level)
        .bind(Json(&document.tags))
        .bind(document.confidential)
        .bind(document.project_id)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(document)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub struct MemDocumentStore {
    documents: MemCollection<Document>,
}

impl MemDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: MemCollection::new(),
        }
    }
}

impl Default for MemDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemDocumentStore {
    async fn list(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.documents.all())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Document>, StoreError> {
        Ok(self.documents.find(|d| d.id == id))
    }

    async fn insert(&self, document: Document) -> Result<(), StoreError> {
        self.documents.insert_first(document);
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> Result<Document, StoreError> {
        self.documents
            .update_first(|d| d.id == id, |d| patch.apply(d))
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        if self.documents.remove_where(|d| d.id == id) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}
