//! CRM
//!
//! Relationship tracking: contacts, the interactions logged against them,
//! and sales opportunities. Each entity kind is self-contained in its own
//! file: model, store trait with both backends, and handlers.

pub mod contacts;
pub mod interactions;
pub mod opportunities;

pub use contacts::{ContactStore, CrmContact, MemContactStore, PgContactStore};
pub use interactions::{Interaction, InteractionStore, MemInteractionStore, PgInteractionStore};
pub use opportunities::{MemOpportunityStore, Opportunity, OpportunityStore, PgOpportunityStore};
