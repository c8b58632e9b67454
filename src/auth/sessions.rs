/**
 * Session Tokens
 *
 * This module handles JWT generation and validation for user sessions.
 *
 * Tokens are stateless: the embedded email and role are a snapshot taken at
 * issuance and may drift from the live user record. There is no refresh and
 * no revocation list; a token is valid until it expires.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::users::{Role, User};

/// Token lifetime: 7 days.
const TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

const DEV_SECRET: &str = "devsecret";

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email snapshot at issuance
    pub email: String,
    /// Role snapshot at issuance
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

static JWT_SECRET: OnceLock<String> = OnceLock::new();

/// Signing secret from `JWT_SECRET`. Falling back to the dev default is a
/// misconfiguration in any production posture, so the fallback is logged
/// loudly (once) rather than applied silently.
fn jwt_secret() -> &'static str {
    JWT_SECRET.get_or_init(|| match std::env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            tracing::warn!(
                "JWT_SECRET is not set; falling back to the insecure dev default"
            );
            DEV_SECRET.to_string()
        }
    })
}

/// Create a signed token for a verified user.
///
/// Claims carry the user's id, email, and role plus issued-at and a 7-day
/// expiry.
pub fn create_token(user: &User) -> Result<String, jsonwebtoken::errors::Error> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_secs();

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        exp: now + TOKEN_TTL_SECS,
        iat: now,
    };

    let key = EncodingKey::from_secret(jwt_secret().as_ref());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a token.
///
/// Default validation checks the signature and expiry.
pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(jwt_secret().as_ref());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn demo_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            first_name: Some("Test".to_string()),
            last_name: None,
            role: Role::Employee,
            password_hash: String::new(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let user = demo_user();
        let token = create_token(&user).unwrap();
        assert!(!token.is_empty());

        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Employee);
    }

    #[test]
    fn test_expiry_is_seven_days_out() {
        let token = create_token(&demo_user()).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(verify_token("not.a.token").is_err());
    }

    #[test]
    fn test_verify_rejects_tampered_token() {
        let token = create_token(&demo_user()).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });
        assert!(verify_token(&tampered).is_err());
    }

    /// Once issued, a token stays valid for its full lifetime even if the
    /// underlying user record changes or disappears. Accepted property of
    /// the stateless design, not a defect.
    #[test]
    fn test_token_outlives_roster_changes() {
        let mut user = demo_user();
        let token = create_token(&user).unwrap();

        // "Disable" the user after issuance; nothing consults the record.
        user.role = Role::Client;
        user.email = "changed@example.com".to_string();

        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.role, Role::Employee);
        assert_eq!(claims.email, "test@example.com");
    }
}
