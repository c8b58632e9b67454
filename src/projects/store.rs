//! Project store: one trait, two backends.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{Project, ProjectMeta, ProjectPatch};
use crate::store::{MemCollection, StoreError};

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// All projects, newest-first.
    async fn list(&self) -> Result<Vec<Project>, StoreError>;

    async fn insert(&self, project: Project) -> Result<(), StoreError>;

    /// Merge `patch` over the existing record; `NotFound` if the id is absent.
    async fn update(&self, id: Uuid, patch: ProjectPatch) -> Result<Project, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

pub struct PgProjectStore {
    pool: PgPool,
}

impl PgProjectStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn project_from_row(row: &sqlx::postgres::PgRow) -> Project {
    Project {
        id: row.get("id"),
        title: row.get("title"),
        status: row.get("status"),
        owner_id: row.get("owner_id"),
        created_at: row.get("created_at"),
        meta: row.get::<Json<ProjectMeta>, _>("metadata").0,
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn list(&self) -> Result<Vec<Project>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, status, owner_id, created_at, metadata
            FROM projects
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(project_from_row).collect())
    }

    async fn insert(&self, project: Project) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, title, status, owner_id, created_at, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(project.id)
        .bind(&project.title)
        .bind(&project.status)
        .bind(project.owner_id)
        .bind(project.created_at)
        .bind(Json(&project.meta))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: Uuid, patch: ProjectPatch) -> Result<Project, StoreError> {
        // Load-merge-store keeps the per-field merge rule identical across
        // backends. Last writer wins; no optimistic locking.
        let row = sqlx::query(
            r#"
            SELECT id, title, status, owner_id, created_at, metadata
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        let mut project = project_from_row(&row);
        patch.apply(&mut project);

        sqlx::query(
            r#"
            UPDATE projects SET title = $2, status = $3, metadata = $4 WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&project.title)
        .bind(&project.status)
        .bind(Json(&project.meta))
        .execute(&self.pool)
        .await?;

        Ok(project)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub struct MemProjectStore {
    projects: MemCollection<Project>,
}

impl MemProjectStore {
    pub fn new() -> Self {
        Self {
            projects: MemCollection::new(),
        }
    }
}

impl Default for MemProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectStore for MemProjectStore {
    async fn list(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.projects.all())
    }

    async fn insert(&self, project: Project) -> Result<(), StoreError> {
        self.projects.insert_first(project);
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: ProjectPatch) -> Result<Project, StoreError> {
        self.projects
            .update_first(|p| p.id == id, |p| patch.apply(p))
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        if self.projects.remove_where(|p| p.id == id) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::users::Role;
    use crate::middleware::Identity;
    use crate::projects::NewProject;

    fn caller() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "alex@opsdesk.example".to_string(),
            role: Role::Employee,
        }
    }

    fn project(title: &str) -> Project {
        let input: NewProject =
            serde_json::from_value(serde_json::json!({ "title": title })).unwrap();
        Project::create(input, &caller())
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = MemProjectStore::new();
        store.insert(project("first")).await.unwrap();
        store.insert(project("second")).await.unwrap();

        let titles: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found_every_time() {
        let store = MemProjectStore::new();
        let p = project("short-lived");
        let id = p.id;
        store.insert(p).await.unwrap();

        assert!(store.delete(id).await.is_ok());
        assert!(matches!(store.delete(id).await, Err(StoreError::NotFound)));
        assert!(matches!(
            store.delete(Uuid::new_v4()).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemProjectStore::new();
        let result = store.update(Uuid::new_v4(), ProjectPatch::default()).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }
}
