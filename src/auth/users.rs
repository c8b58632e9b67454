/**
 * User Model and Credential Verification
 *
 * This module defines the canonical user shape, the user store trait with
 * its two backends, and the credential verifier used by login.
 *
 * The persistent backend reads the `users` table. The in-memory backend is
 * a fixed demo roster; it supports lookup but not registration, so account
 * creation requires a configured database.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::store::{MemCollection, StoreError};

/// Fixed set of user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::Client => "client",
        }
    }

    /// Parse a stored role string, defaulting unknown values to `Client`.
    pub fn from_str(s: &str) -> Role {
        match s {
            "admin" => Role::Admin,
            "employee" => Role::Employee,
            _ => Role::Client,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Client
    }
}

/// A user record. The password hash never leaves this module's callers;
/// responses use [`User::public_view`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub password_hash: String,
}

impl User {
    /// Best-effort display name: join first/last when both exist, fall back
    /// to whichever part is present, else a generic label.
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => "User".to_string(),
        }
    }

    /// The user view returned by login: id, email, role, display name.
    pub fn public_view(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            name: self.display_name(),
        }
    }
}

/// User information safe to return to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub name: String,
}

/// Input for registration.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub password_hash: String,
}

/// Store seam for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by exact email match; email is unique.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Create a user. Fails with [`StoreError::Unavailable`] on the
    /// in-memory backend — registration has no fallback.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
}

/// Verify an email + plaintext password against the active store.
///
/// Returns `Ok(None)` uniformly whether the email is unknown or the
/// password does not match, so callers cannot tell which half failed.
/// No lockout, no attempt counting.
pub async fn verify_credentials(
    store: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<Option<User>, StoreError> {
    let Some(user) = store.find_by_email(email).await? else {
        tracing::debug!("Login attempt for unknown email");
        return Ok(None);
    };

    match bcrypt::verify(password, &user.password_hash) {
        Ok(true) => Ok(Some(user)),
        Ok(false) => {
            tracing::debug!("Password mismatch for {}", email);
            Ok(None)
        }
        Err(e) => {
            tracing::error!("Password verification error: {:?}", e);
            Ok(None)
        }
    }
}

/// PostgreSQL-backed user store.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        role: Role::from_str(row.get::<String, _>("role").as_str()),
        password_hash: row.get("password_hash"),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, first_name, last_name, role, password_hash
            FROM users
            WHERE email = $1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| user_from_row(&r)))
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, first_name, last_name, role, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            password_hash: user.password_hash,
        })
    }
}

// Demo credential for the roster below: "Password123!"
const DEMO_PASSWORD_HASH: &str = "$2a$10$rGYI9XVxjwIgFU/9ahaQCeIGgQNPcCvm2A3enC41TqSG1Utoh8AeS";

/// Fixed demo roster used when no database is configured. One identity per
/// role; ids are stable so stamped owner fields survive restarts.
fn demo_roster() -> Vec<User> {
    vec![
        User {
            id: Uuid::from_u128(1),
            email: "admin@opsdesk.example".to_string(),
            first_name: Some("Admin".to_string()),
            last_name: Some("User".to_string()),
            role: Role::Admin,
            password_hash: DEMO_PASSWORD_HASH.to_string(),
        },
        User {
            id: Uuid::from_u128(2),
            email: "alex@opsdesk.example".to_string(),
            first_name: Some("Alex".to_string()),
            last_name: Some("Smith".to_string()),
            role: Role::Employee,
            password_hash: DEMO_PASSWORD_HASH.to_string(),
        },
        User {
            id: Uuid::from_u128(3),
            email: "client@example.com".to_string(),
            first_name: Some("John".to_string()),
            last_name: Some("Stevens".to_string()),
            role: Role::Client,
            password_hash: DEMO_PASSWORD_HASH.to_string(),
        },
    ]
}

/// In-memory user store: the fixed demo roster.
pub struct MemUserStore {
    users: MemCollection<User>,
}

impl MemUserStore {
    pub fn new() -> Self {
        Self {
            users: MemCollection::with_items(demo_roster()),
        }
    }
}

impl Default for MemUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.find(|u| u.email == email))
    }

    async fn create(&self, _user: NewUser) -> Result<User, StoreError> {
        Err(StoreError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_joins_parts() {
        let mut user = demo_roster().remove(1);
        assert_eq!(user.display_name(), "Alex Smith");

        user.last_name = None;
        assert_eq!(user.display_name(), "Alex");

        user.first_name = None;
        user.last_name = Some("Smith".to_string());
        assert_eq!(user.display_name(), "Smith");

        user.last_name = None;
        assert_eq!(user.display_name(), "User");
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Employee, Role::Client] {
            assert_eq!(Role::from_str(role.as_str()), role);
        }
        // Unknown stored values degrade to the least-privileged role
        assert_eq!(Role::from_str("superuser"), Role::Client);
    }

    #[tokio::test]
    async fn test_roster_lookup_and_password() {
        let store = MemUserStore::new();

        let user = verify_credentials(&store, "alex@opsdesk.example", "Password123!")
            .await
            .unwrap()
            .expect("demo employee should verify");
        assert_eq!(user.role, Role::Employee);
        assert_eq!(user.id, Uuid::from_u128(2));
    }

    #[tokio::test]
    async fn test_bad_password_and_unknown_email_look_identical() {
        let store = MemUserStore::new();

        let wrong_password = verify_credentials(&store, "alex@opsdesk.example", "nope")
            .await
            .unwrap();
        let unknown_email = verify_credentials(&store, "ghost@opsdesk.example", "Password123!")
            .await
            .unwrap();

        assert!(wrong_password.is_none());
        assert!(unknown_email.is_none());
    }

    #[tokio::test]
    async fn test_roster_rejects_registration() {
        let store = MemUserStore::new();
        let result = store
            .create(NewUser {
                email: "new@opsdesk.example".to_string(),
                first_name: None,
                last_name: None,
                role: Role::Client,
                password_hash: "x".to_string(),
            })
            .await;
        assert!(matches!(result, Err(StoreError::Unavailable)));
    }
}
