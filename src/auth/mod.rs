pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::error::ApiError;

/// Claims carried by a session token. Stateless; lifecycle is bounded by
/// the embedded expiry alone.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Identity id of the authenticated user.
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        let now = Utc::now();
        let expiry_secs = config::config().security.token_expiry_secs;

        Self {
            sub: user_id,
            email: email.into(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token generation failed: {0}")]
    TokenGeneration(String),

    #[error("signing secret not configured")]
    MissingSecret,

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid token")]
    InvalidToken,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ExpiredToken => ApiError::authentication("Token has expired"),
            AuthError::InvalidToken => ApiError::authentication("Invalid token"),
            other => ApiError::internal(other.to_string()),
        }
    }
}

/// Sign a session token for the given identity.
pub fn issue_token(user_id: Uuid, email: &str) -> Result<String, AuthError> {
    sign(&Claims::new(user_id, email))
}

pub(crate) fn sign(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verify a bearer token and extract its claims. Expiry is reported
/// distinctly from every other decode failure.
pub fn verify_token(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    match decode::<Claims>(token, &key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) => match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(AuthError::ExpiredToken),
            _ => Err(AuthError::InvalidToken),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_preserves_identity() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, "ann@example.com").unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "ann@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let now = Utc::now().timestamp();
        // Well past the default decode leeway
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "ann@example.com".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = sign(&claims).unwrap();
        assert!(matches!(verify_token(&token), Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn tampered_token_is_invalid() {
        let token = issue_token(Uuid::new_v4(), "ann@example.com").unwrap();
        let mut tampered = token;
        tampered.push('x');
        assert!(matches!(
            verify_token(&tampered),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            verify_token("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }
}
