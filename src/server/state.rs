/**
 * Application State
 *
 * `AppState` is the central state container injected into every handler.
 * It holds one store trait object per entity kind plus the notification
 * mailer. The storage backend behind the trait objects is decided exactly
 * once, by the constructor that is called at startup - handlers never see
 * a pool and never branch on the storage medium.
 *
 * # Thread Safety
 *
 * All stores are `Send + Sync` behind `Arc`; the in-memory implementations
 * guard their collections with a mutex so every store call stays atomic
 * under parallel handlers.
 */

use std::sync::Arc;
use std::time::Instant;

use sqlx::PgPool;

use crate::assistant::{AssistantStore, MemAssistantStore, PgAssistantStore};
use crate::auth::users::{MemUserStore, PgUserStore, UserStore};
use crate::calendar::{EventStore, MemEventStore, PgEventStore};
use crate::contracts::{ContractStore, MemContractStore, PgContractStore};
use crate::crm::{
    ContactStore, InteractionStore, MemContactStore, MemInteractionStore, MemOpportunityStore,
    OpportunityStore, PgContactStore, PgInteractionStore, PgOpportunityStore,
};
use crate::documents::{DocumentStore, MemDocumentStore, PgDocumentStore};
use crate::messages::{MemMessageStore, MessageStore, PgMessageStore};
use crate::notify::Mailer;
use crate::outreach::{MemSubmissionStore, PgSubmissionStore, SubmissionStore};
use crate::projects::{MemProjectStore, PgProjectStore, ProjectStore};
use crate::tasks::{MemTaskStore, PgTaskStore, TaskStore};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub messages: Arc<dyn MessageStore>,
    pub events: Arc<dyn EventStore>,
    pub contracts: Arc<dyn ContractStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub crm_contacts: Arc<dyn ContactStore>,
    pub crm_interactions: Arc<dyn InteractionStore>,
    pub crm_opportunities: Arc<dyn OpportunityStore>,
    pub submissions: Arc<dyn SubmissionStore>,
    pub assistant: Arc<dyn AssistantStore>,
    pub mailer: Mailer,
    /// Process start, reported by the health probe
    pub started_at: Instant,
}

impl AppState {
    /// All stores backed by PostgreSQL.
    pub fn postgres(pool: PgPool, mailer: Mailer) -> AppState {
        AppState {
            users: Arc::new(PgUserStore::new(pool.clone())),
            projects: Arc::new(PgProjectStore::new(pool.clone())),
            messages: Arc::new(PgMessageStore::new(pool.clone())),
            events: Arc::new(PgEventStore::new(pool.clone())),
            contracts: Arc::new(PgContractStore::new(pool.clone())),
            tasks: Arc::new(PgTaskStore::new(pool.clone())),
            documents: Arc::new(PgDocumentStore::new(pool.clone())),
            crm_contacts: Arc::new(PgContactStore::new(pool.clone())),
            crm_interactions: Arc::new(PgInteractionStore::new(pool.clone())),
            crm_opportunities: Arc::new(PgOpportunityStore::new(pool.clone())),
            submissions: Arc::new(PgSubmissionStore::new(pool.clone())),
            assistant: Arc::new(PgAssistantStore::new(pool)),
            mailer,
            started_at: Instant::now(),
        }
    }

    /// All stores backed by in-process collections. Users come from the
    /// fixed demo roster; assistant history is not recorded.
    pub fn in_memory(mailer: Mailer) -> AppState {
        AppState {
            users: Arc::new(MemUserStore::new()),
            projects: Arc::new(MemProjectStore::new()),
            messages: Arc::new(MemMessageStore::new()),
            events: Arc::new(MemEventStore::new()),
            contracts: Arc::new(MemContractStore::new()),
            tasks: Arc::new(MemTaskStore::new()),
            documents: Arc::new(MemDocumentStore::new()),
            crm_contacts: Arc::new(MemContactStore::new()),
            crm_interactions: Arc::new(MemInteractionStore::new()),
            crm_opportunities: Arc::new(MemOpportunityStore::new()),
            submissions: Arc::new(MemSubmissionStore::new()),
            assistant: Arc::new(MemAssistantStore),
            mailer,
            started_at: Instant::now(),
        }
    }
}
