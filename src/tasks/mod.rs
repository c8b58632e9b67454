//! Tasks
//!
//! Task tracking with assignee/project references and a tag set. Status and
//! priority are open strings set by the caller; there is no server-enforced
//! transition graph (a task may move from "pending" straight to
//! "completed").

pub mod handlers;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::Identity;

pub use store::{MemTaskStore, PgTaskStore, TaskStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<DateTime<Utc>>,
    pub assignee_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub created_by: Uuid,
    pub completed_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_task_status() -> String {
    "pending".to_string()
}

fn default_priority() -> String {
    "medium".to_string()
}

#[derive(Debug, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_task_status")]
    pub status: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignee_id: Option<Uuid>,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Task {
    pub fn create(input: NewTask, creator: &Identity) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            due_date: input.due_date,
            assignee_id: input.assignee_id,
            project_id: input.project_id,
            created_by: creator.id,
            completed_at: None,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Update input. Absent fields leave the record untouched; `updated_at` is
/// refreshed on every update.
#[derive(Debug, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub assignee_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub tags: Option<Vec<String>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskPatch {
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if self.description.is_some() {
            task.description = self.description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if self.due_date.is_some() {
            task.due_date = self.due_date;
        }
        if self.assignee_id.is_some() {
            task.assignee_id = self.assignee_id;
        }
        if self.project_id.is_some() {
            task.project_id = self.project_id;
        }
        if let Some(tags) = self.tags {
            task.tags = tags;
        }
        if self.completed_at.is_some() {
            task.completed_at = self.completed_at;
        }
        task.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::users::Role;

    fn creator() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "alex@opsdesk.example".to_string(),
            role: Role::Employee,
        }
    }

    #[tokio::test]
    async fn test_status_only_patch_preserves_rest_and_bumps_updated_at() {
        let input: NewTask = serde_json::from_value(serde_json::json!({
            "title": "File the report",
            "description": "Q3 numbers",
            "assignee_id": Uuid::new_v4(),
        }))
        .unwrap();
        let mut task = Task::create(input, &creator());
        let before = task.updated_at;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let patch: TaskPatch =
            serde_json::from_value(serde_json::json!({ "status": "completed" })).unwrap();
        patch.apply(&mut task);

        assert_eq!(task.status, "completed");
        assert_eq!(task.title, "File the report");
        assert_eq!(task.description.as_deref(), Some("Q3 numbers"));
        assert!(task.assignee_id.is_some());
        assert!(task.updated_at > before);
    }

    #[test]
    fn test_create_stamps_creator_and_defaults() {
        let input: NewTask =
            serde_json::from_value(serde_json::json!({ "title": "Call the client" })).unwrap();
        let caller = creator();
        let task = Task::create(input, &caller);

        assert_eq!(task.created_by, caller.id);
        assert_eq!(task.status, "pending");
        assert_eq!(task.priority, "medium");
        assert!(task.completed_at.is_none());
    }
}
