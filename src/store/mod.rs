/**
 * Storage Layer Shared Types
 *
 * Every entity kind defines a store trait with two implementations: one
 * backed by PostgreSQL and one by an in-process collection. The backend is
 * chosen once at startup (see `server::config`) and handlers only ever see
 * the trait objects, so business logic never branches on the storage medium.
 */

pub mod memory;

use thiserror::Error;

pub use memory::MemCollection;

/// Errors shared by all store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the requested id exists in the active store
    #[error("record not found")]
    NotFound,

    /// The operation requires a persistent store and none is configured
    #[error("persistent store not configured")]
    Unavailable,

    /// A persistent-store round trip failed
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
