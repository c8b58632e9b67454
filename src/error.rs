/**
 * API Error Types
 *
 * This module defines the error taxonomy exposed by HTTP handlers and the
 * conversion into HTTP responses.
 *
 * # Error Categories
 *
 * - `Unauthorized` - missing, malformed, or expired bearer token. Reported
 *   identically to the caller regardless of which case occurred.
 * - `NotFound` - the target id is absent from the active store.
 * - `BadRequest` - the request body or parameters are unusable.
 * - `Misconfigured` - the operation requires a persistent store that is not
 *   configured (e.g. registration has no in-memory fallback).
 * - `Upstream` - a persistent-store round trip failed. The detail is logged;
 *   the caller only sees a generic message.
 */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by API handlers.
///
/// Every variant maps to an HTTP status and a minimal `{"error": <string>}`
/// JSON body. No variant carries storage internals or stack detail to the
/// client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid credentials/token
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Target record does not exist in the active store
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Unusable request input
    #[error("{0}")]
    BadRequest(String),

    /// Operation requires a persistent store that is not configured
    #[error("{0}")]
    Misconfigured(&'static str),

    /// Persistent-store failure; detail is logged, never exposed
    #[error("Internal server error")]
    Upstream,
}

impl ApiError {
    /// Uniform 401 for any token problem. Call sites log the distinction
    /// (missing vs invalid); the response body does not reveal it.
    pub fn unauthorized() -> Self {
        Self::Unauthorized("Unauthorized")
    }

    /// Uniform 401 for any credential mismatch at login, whether the email
    /// was unknown or the password wrong.
    pub fn invalid_credentials() -> Self {
        Self::Unauthorized("Invalid credentials")
    }

    /// Convert a store error, labeling `NotFound` with the entity kind so
    /// the body reads e.g. `{"error": "Project not found"}`.
    pub fn from_store(err: StoreError, what: &'static str) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound(what),
            other => other.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Misconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound("Record"),
            StoreError::Unavailable => Self::Misconfigured("Database not configured"),
            StoreError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                Self::Upstream
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::unauthorized().status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NotFound("Project").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Misconfigured("Database not configured").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::Upstream.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_error_conversion() {
        let err: ApiError = StoreError::NotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: ApiError = StoreError::Unavailable.into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Database not configured");
    }

    #[test]
    fn test_upstream_message_is_generic() {
        assert_eq!(ApiError::Upstream.to_string(), "Internal server error");
    }
}
