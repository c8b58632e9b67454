/**
 * Assistant
 *
 * A canned-response assistant: queries are matched against a static keyword
 * table and answered from it. No model, no external calls. Query/response
 * pairs are recorded per user on the persistent backend only; the
 * in-memory backend keeps no history.
 */

pub mod handlers;
pub mod knowledge;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use knowledge::respond;
pub use store::{AssistantStore, MemAssistantStore, PgAssistantStore};

/// A recorded query/response pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiInteraction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub query: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

impl AiInteraction {
    pub fn new(user_id: Uuid, query: String, response: String) -> AiInteraction {
        AiInteraction {
            id: Uuid::new_v4(),
            user_id,
            query,
            response,
            created_at: Utc::now(),
        }
    }
}
