//! opsdesk backend
//!
//! A JSON-over-HTTP backend for a small advisory business: authentication,
//! projects, tasks, documents, messaging, calendar events, contracts, a CRM
//! module, public outreach forms, and a canned-response assistant.
//!
//! Every resource accessor is backed by one of two storage media: PostgreSQL
//! (when `DATABASE_URL` is configured) or an in-process collection. The
//! backend is chosen once at startup and injected into [`server::state::AppState`]
//! as store trait objects, so handlers never branch on the storage medium.
//!
//! # Module Structure
//!
//! ```text
//! src/
//! ├── server/      - configuration, application state, initialization
//! ├── routes.rs    - /api route table and cross-cutting layers
//! ├── auth/        - credential verification, JWT sessions, auth handlers
//! ├── middleware/  - AuthUser extractor for protected routes
//! ├── store/       - shared store error type + in-memory collection
//! ├── projects/    - project accessor (model, store, handlers)
//! ├── messages/    - messaging with group fan-out and thread replies
//! ├── calendar/    - calendar events with date filters
//! ├── contracts/   - contract accessor
//! ├── tasks/       - task accessor
//! ├── documents/   - document records accessor
//! ├── crm/         - CRM contacts, interactions, opportunities
//! ├── outreach/    - public contact + meeting-request forms
//! ├── assistant/   - keyword-matched assistant + interaction history
//! ├── notify/      - outbound email notifications (Resend API)
//! └── error.rs     - API error taxonomy
//! ```

pub mod assistant;
pub mod auth;
pub mod calendar;
pub mod contracts;
pub mod crm;
pub mod documents;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod notify;
pub mod outreach;
pub mod projects;
pub mod routes;
pub mod server;
pub mod store;
pub mod tasks;

pub use error::ApiError;
pub use server::state::AppState;
