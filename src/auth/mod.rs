//! Authentication
//!
//! Credential verification, JWT session tokens, and the auth HTTP handlers.
//!
//! The credential verifier resolves an email + plaintext password into a
//! canonical user view against either the persistent user table or the
//! fixed in-memory demo roster. Tokens are stateless HS256 assertions with
//! a 7-day expiry; there is no refresh or revocation.

pub mod handlers;
pub mod sessions;
pub mod users;

pub use handlers::{login, profile, register};
pub use sessions::{create_token, verify_token, Claims};
pub use users::{Role, User, UserStore};
