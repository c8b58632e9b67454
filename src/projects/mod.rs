/**
 * Projects
 *
 * Project tracking: a title, a free-form status, an owning user, and a
 * loosely structured metadata bag (client, deadline, team, subtasks, type,
 * progress, last update). The metadata bag is a typed struct of optional
 * fields; it is flattened into the JSON representation and serialized into
 * the single `metadata` jsonb column on the persistent side.
 */

pub mod handlers;
pub mod store;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::Identity;

pub use store::{MemProjectStore, PgProjectStore, ProjectStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub meta: ProjectMeta,
}

/// Loosely structured project fields. All optional; absent fields are
/// omitted from responses and left untouched by updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<String>>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

impl ProjectMeta {
    /// First-non-null-wins merge of `patch` over `self`.
    fn merge(&mut self, patch: ProjectMeta) {
        if patch.client.is_some() {
            self.client = patch.client;
        }
        if patch.deadline.is_some() {
            self.deadline = patch.deadline;
        }
        if patch.team.is_some() {
            self.team = patch.team;
        }
        if patch.subtasks.is_some() {
            self.subtasks = patch.subtasks;
        }
        if patch.kind.is_some() {
            self.kind = patch.kind;
        }
        if patch.progress.is_some() {
            self.progress = patch.progress;
        }
    }
}

fn default_status() -> String {
    "Active".to_string()
}

/// Create input. The owner is stamped from the caller's identity, never
/// taken from the body.
#[derive(Debug, Deserialize)]
pub struct NewProject {
    pub title: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(flatten)]
    pub meta: ProjectMeta,
}

impl Project {
    pub fn create(input: NewProject, owner: &Identity) -> Project {
        let now = Utc::now();
        let mut meta = input.meta;
        meta.progress.get_or_insert(0);
        meta.last_update = Some(now);

        Project {
            id: Uuid::new_v4(),
            title: input.title,
            status: input.status,
            owner_id: owner.id,
            created_at: now,
            meta,
        }
    }
}

/// Update input: absent fields leave the record untouched.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub meta: ProjectMeta,
}

impl ProjectPatch {
    pub fn apply(self, project: &mut Project) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        project.meta.merge(self.meta);
        project.meta.last_update = Some(Utc::now());
    }
}
