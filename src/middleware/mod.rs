//! Request middleware
//!
//! Authentication extraction for protected routes.

pub mod auth;

pub use auth::{AuthUser, Identity};
