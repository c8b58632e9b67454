/**
 * Authentication Extractor
 *
 * Protected handlers take an [`AuthUser`] argument; extraction parses the
 * `Authorization: Bearer <token>` header and verifies the token.
 *
 * A missing header and an invalid/expired token are logged distinctly but
 * produce the same 401 response, so callers cannot probe which case they
 * hit.
 */

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::sessions::verify_token;
use crate::auth::users::Role;
use crate::error::ApiError;

/// The caller's verified identity, decoded from token claims.
///
/// Accessors use this to stamp owner/sender/creator fields. The display
/// label falls back to the email because tokens carry no name claim.
#[derive(Clone, Debug)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl Identity {
    /// Denormalized display snapshot stored on records that carry one
    /// (message sender, event owner).
    pub fn display_label(&self) -> String {
        self.email.clone()
    }
}

/// Axum extractor for the authenticated user.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                tracing::warn!("Missing Authorization header");
                ApiError::unauthorized()
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            tracing::warn!("Malformed Authorization header");
            ApiError::unauthorized()
        })?;

        let claims = verify_token(token).map_err(|e| {
            tracing::warn!("Invalid token: {:?}", e);
            ApiError::unauthorized()
        })?;

        let id = Uuid::parse_str(&claims.sub).map_err(|e| {
            tracing::warn!("Invalid user id in token: {:?}", e);
            ApiError::unauthorized()
        })?;

        Ok(AuthUser(Identity {
            id,
            email: claims.email,
            role: claims.role,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::sessions::create_token;
    use crate::auth::users::User;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<AuthUser, ApiError> {
        let (mut parts, _) = request.into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_identity_from_bearer_token() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            first_name: None,
            last_name: None,
            role: Role::Admin,
            password_hash: String::new(),
        };
        let token = create_token(&user).unwrap();

        let request = Request::builder()
            .uri("/api/projects")
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .body(())
            .unwrap();

        let AuthUser(identity) = extract(request).await.unwrap();
        assert_eq!(identity.id, user.id);
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.display_label(), "test@example.com");
    }

    #[tokio::test]
    async fn test_missing_and_invalid_tokens_fail_identically() {
        let missing = extract(Request::builder().uri("/").body(()).unwrap())
            .await
            .unwrap_err();

        let invalid = extract(
            Request::builder()
                .uri("/")
                .header(AUTHORIZATION, "Bearer not.a.token")
                .body(())
                .unwrap(),
        )
        .await
        .unwrap_err();

        let unshaped = extract(
            Request::builder()
                .uri("/")
                .header(AUTHORIZATION, "Token abc")
                .body(())
                .unwrap(),
        )
        .await
        .unwrap_err();

        assert_eq!(missing.to_string(), invalid.to_string());
        assert_eq!(missing.to_string(), unshaped.to_string());
        assert_eq!(missing.status_code(), invalid.status_code());
    }
}
