//! Task store: one trait, two backends.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{Task, TaskPatch};
use crate::store::{MemCollection, StoreError};

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>, StoreError>;

    async fn insert(&self, task: Task) -> Result<(), StoreError>;

    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TASK_COLUMNS: &str = "id, title, description, status, priority, due_date, assignee_id, \
                            project_id, created_by, completed_at, tags, created_at, updated_at";

fn task_from_row(row: &sqlx::postgres::PgRow) -> Task {
    Task {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        status: row.get("status"),
        priority: row.get("priority"),
        due_date: row.get("due_date"),
        assignee_id: row.get("assignee_id"),
        project_id: row.get("project_id"),
        created_by: row.get("created_by"),
        completed_at: row.get("completed_at"),
        tags: row.get::<Json<Vec<String>>, _>("tags").0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(task_from_row).collect())
    }

    async fn insert(&self, task: Task) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, status, priority, due_date, assignee_id,
                               project_id, created_by, completed_at, tags, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .bind(&task.priority)
        .bind(task.due_date)
        .bind(task.assignee_id)
        .bind(task.project_id)
        .bind(task.created_by)
        .bind(task.completed_at)
        .bind(Json(&task.tags))
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError> {
        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        let mut task = task_from_row(&row);
        patch.apply(&mut task);

        sqlx::query(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, status = $4, priority = $5, due_date = $6,
                assignee_id = $7, project_id = $8, completed_at = $9, tags = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .bind(&task.priority)
        .bind(task.due_date)
        .bind(task.assignee_id)
        .bind(task.project_id)
        .bind(task.completed_at)
        .bind(Json(&task.tags))
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub struct MemTaskStore {
    tasks: MemCollection<Task>,
}

impl MemTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: MemCollection::new(),
        }
    }
}

impl Default for MemTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for MemTaskStore {
    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.all())
    }

    async fn insert(&self, task: Task) -> Result<(), StoreError> {
        self.tasks.insert_first(task);
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError> {
        self.tasks
            .update_first(|t| t.id == id, |t| patch.apply(t))
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        if self.tasks.remove_where(|t| t.id == id) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}
