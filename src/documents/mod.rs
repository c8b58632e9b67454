//! Documents
//!
//! Document records: stored/original filename pair, size, mime type,
//! category, storage path, uploader, access level, tags, confidentiality
//! flag, and an optional project reference. Only metadata lives here — the
//! bytes are on whatever storage the path points at.

pub mod handlers;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::Identity;

pub use store::{DocumentStore, MemDocumentStore, PgDocumentStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub filename: String,
    pub original_filename: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub category: String,
    pub description: String,
    pub storage_path: String,
    pub uploaded_by: Uuid,
    pub access_level: String,
    pub tags: Vec<String>,
    pub confidential: bool,
    pub project_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_access_level() -> String {
    "private".to_string()
}

#[derive(Debug, Deserialize)]
pub struct NewDocument {
    pub filename: String,
    pub original_filename: String,
    #[serde(default)]
    pub file_size: Option<i64>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub storage_path: Option<String>,
    #[serde(default = "default_access_level")]
    pub access_level: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub confidential: bool,
    #[serde(default)]
    pub project_id: Option<Uuid>,
}

impl Document {
    pub fn create(input: NewDocument, uploader: &Identity) -> Document {
        let now = Utc::now();
        let storage_path = input
            .storage_path
            .unwrap_or_else(|| format!("/uploads/{}", input.filename));

        Document {
            id: Uuid::new_v4(),
            filename: input.filename,
            original_filename: input.original_filename,
            file_size: input.file_size,
            mime_type: input.mime_type,
            category: input.category,
            description: input.description,
            storage_path,
            uploaded_by: uploader.id,
            access_level: input.access_level,
            tags: input.tags,
            confidential: input.confidential,
            project_id: input.project_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentPatch {
    pub category: Option<String>,
    pub description: Option<String>,
    pub access_level: Option<String>,
    pub tags: Option<Vec<String>>,
    pub confidential: Option<bool>,
    pub project_id: Option<Uuid>,
}

impl DocumentPatch {
    pub fn apply(self, document: &mut Document) {
        if let Some(category) = self.category {
            document.category = category;
        }
        if let Some(description) = self.description {
            document.description = description;
        }
        if let Some(access_level) = self.access_level {
            document.access_level = access_level;
        }
        if let Some(tags) = self.tags {
            document.tags = tags;
        }
        if let Some(confidential) = self.confidential {
            document.confidential = confidential;
        }
        if self.project_id.is_some() {
            document.project_id = self.project_id;
        }
        document.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::users::Role;

    #[test]
    fn test_storage_path_defaults_from_filename() {
        let input: NewDocument = serde_json::from_value(serde_json::json!({
            "filename": "a1b2.pdf",
            "original_filename": "Q3 report.pdf",
        }))
        .unwrap();
        let uploader = Identity {
            id: Uuid::new_v4(),
            email: "alex@opsdesk.example".to_string(),
            role: Role::Employee,
        };
        let doc = Document::create(input, &uploader);

        assert_eq!(doc.storage_path, "/uploads/a1b2.pdf");
        assert_eq!(doc.category, "general");
        assert_eq!(doc.access_level, "private");
        assert_eq!(doc.uploaded_by, uploader.id);
        assert!(!doc.confidential);
    }
}
