//! Signed session tokens.
//!
//! HS256-signed, time-limited tokens carry the session claims; the server
//! keeps no token store. Verification is purely computational given the
//! shared secret, and every failure mode (bad signature, malformed token,
//! expired) collapses to `None` so callers cannot tell them apart.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::session::Session;
use crate::config::{AuthConfig, ConfigError};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// JWT claims. Field names match what the original deployment put on the
/// wire, so tokens issued before a migration keep verifying.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub email: String,
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenCodec {
    secret: String,
    lifetime_secs: i64,
}

impl TokenCodec {
    pub fn new(secret: impl Into<String>, lifetime_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs,
        }
    }

    /// Build a codec from configuration, failing closed when no signing
    /// secret is present. There is deliberately no fallback secret.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        let secret = config
            .jwt_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingJwtSecret)?;
        Ok(Self::new(secret, config.token_lifetime_secs))
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Issue a signed token asserting an authenticated session for `email`.
    pub fn issue(&self, email: &str) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            email: email.to_string(),
            is_authenticated: true,
            iat: now,
            exp: now + self.lifetime_secs,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Verify signature and expiry. Returns `None` on any failure.
    pub fn verify(&self, token: &str) -> Option<Session> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let data = decode::<Claims>(token, &decoding_key, &validation).ok()?;

        // jsonwebtoken treats exp == now as still valid; a token is dead
        // exactly at its expiry second.
        if data.claims.exp <= Utc::now().timestamp() {
            return None;
        }

        Some(Session {
            email: data.claims.email,
            is_authenticated: data.claims.is_authenticated,
            exp: data.claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("unit-test-secret", 24 * 60 * 60)
    }

    #[test]
    fn issue_then_verify_roundtrip() {
        let codec = codec();
        let token = codec.issue("user@example.com").unwrap();
        let session = codec.verify(&token).expect("fresh token should verify");
        assert_eq!(session.email, "user@example.com");
        assert!(session.is_authenticated);
        assert!(session.exp > Utc::now().timestamp());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Zero lifetime: exp == iat == now, and the boundary is exclusive.
        let codec = TokenCodec::new("unit-test-secret", 0);
        let token = codec.issue("user@example.com").unwrap();
        assert!(codec.verify(&token).is_none());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(codec().verify("not-a-jwt").is_none());
        assert!(codec().verify("").is_none());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = codec().issue("user@example.com").unwrap();
        let other = TokenCodec::new("different-secret", 24 * 60 * 60);
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let codec = codec();
        let mut token = codec.issue("user@example.com").unwrap();
        // Flip a character in the payload segment
        let mid = token.len() / 2;
        let replacement = if token.as_bytes()[mid] == b'A' { "B" } else { "A" };
        token.replace_range(mid..mid + 1, replacement);
        assert!(codec.verify(&token).is_none());
    }

    #[test]
    fn missing_secret_fails_closed() {
        let config = AuthConfig::default();
        assert!(matches!(
            TokenCodec::from_config(&config),
            Err(ConfigError::MissingJwtSecret)
        ));

        let config = AuthConfig {
            jwt_secret: Some(String::new()),
            ..Default::default()
        };
        assert!(TokenCodec::from_config(&config).is_err());
    }
}
