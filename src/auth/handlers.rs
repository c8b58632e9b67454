/**
 * Authentication Handlers
 *
 * Handlers for registration, login, and the authenticated profile.
 *
 * # Security
 *
 * - Passwords are hashed with bcrypt before storage and never logged or
 *   returned.
 * - Any credential mismatch at login yields the same 401 body, whether the
 *   email was unknown or the password wrong.
 * - Registration requires the persistent backend; the demo roster cannot be
 *   extended at runtime.
 */

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::sessions::create_token;
use crate::auth::users::{verify_credentials, NewUser, PublicUser, Role};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::server::state::AppState;

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Display name; split at the first space into first/last parts
    #[serde(default)]
    pub name: Option<String>,
    /// Role string; unknown or absent values become "client"
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: token plus the public user view
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Profile response: the identity snapshot carried by the token
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: TokenIdentity,
}

#[derive(Debug, Serialize)]
pub struct TokenIdentity {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// `POST /api/auth/register`
///
/// Creates a user in the persistent store. Fails with 500 when no database
/// is configured — registration has no in-memory fallback.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST).map_err(|e| {
        tracing::error!("Password hashing failed: {:?}", e);
        ApiError::Upstream
    })?;

    let (first_name, last_name) = split_name(request.name.as_deref());
    let role = request.role.as_deref().map(Role::from_str).unwrap_or_default();

    state
        .users
        .create(NewUser {
            email: request.email,
            first_name,
            last_name,
            role,
            password_hash,
        })
        .await?;

    Ok(Json(OkResponse { ok: true }))
}

/// `POST /api/auth/login`
///
/// Verifies the credentials and returns a signed token plus the public user
/// view. Every mismatch returns 401 "Invalid credentials".
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = verify_credentials(state.users.as_ref(), &request.email, &request.password)
        .await?
        .ok_or_else(ApiError::invalid_credentials)?;

    let token = create_token(&user).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        ApiError::Upstream
    })?;

    tracing::info!("User logged in: {}", user.email);

    Ok(Json(LoginResponse {
        token,
        user: user.public_view(),
    }))
}

/// `GET /api/auth/profile`
///
/// Returns the identity snapshot embedded in the caller's token. The data
/// reflects issuance time; it is not re-read from the user store.
pub async fn profile(AuthUser(identity): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        user: TokenIdentity {
            id: identity.id,
            email: identity.email,
            role: identity.role,
        },
    })
}

/// Split a display name at the first space into first/last parts.
fn split_name(name: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return (None, None);
    };
    match name.split_once(' ') {
        Some((first, last)) => (Some(first.to_string()), Some(last.trim().to_string())),
        None => (Some(name.to_string()), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name() {
        assert_eq!(
            split_name(Some("Alex Smith")),
            (Some("Alex".to_string()), Some("Smith".to_string()))
        );
        assert_eq!(split_name(Some("Cher")), (Some("Cher".to_string()), None));
        assert_eq!(split_name(Some("  ")), (None, None));
        assert_eq!(split_name(None), (None, None));
    }
}
