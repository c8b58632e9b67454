/**
 * Public Outreach Forms
 *
 * The two unauthenticated endpoints: contact-form submissions (persisted,
 * then notified) and meeting requests (notified only, nothing persisted).
 *
 * A contact submission that persists but fails to notify still succeeds;
 * the response carries a warning instead of rolling the write back.
 */

pub mod handlers;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use store::{MemSubmissionStore, PgSubmissionStore, SubmissionStore};

/// An anonymous contact-form submission; no owning user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub firm: Option<String>,
    pub phone: Option<String>,
    pub comments: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub firm: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub comments: String,
}

impl ContactSubmission {
    pub fn create(input: NewSubmission) -> ContactSubmission {
        ContactSubmission {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            firm: input.firm,
            phone: input.phone,
            comments: input.comments,
            created_at: Utc::now(),
        }
    }
}

/// A meeting request. Accepts either a single `advisor` or an `advisors`
/// list; the single form is folded into the list.
#[derive(Debug, Deserialize)]
pub struct MeetingRequest {
    #[serde(default)]
    pub advisor: Option<String>,
    #[serde(default)]
    pub advisors: Option<Vec<String>>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub firm: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub selected_times: Vec<DateTime<Utc>>,
}

impl MeetingRequest {
    pub fn advisors(&self) -> Vec<String> {
        match (&self.advisors, &self.advisor) {
            (Some(list), _) => list.clone(),
            (None, Some(single)) => vec![single.clone()],
            (None, None) => Vec::new(),
        }
    }
}
