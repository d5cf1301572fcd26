//! Bearer token issuing and verification
//!
//! HS256-signed tokens carrying the subject user id and an expiry. The
//! signing key is process-wide configuration; there is no rotation.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: String,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
    /// Token id
    pub jti: String,
}

pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenManager {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Sign a token for the given user with the configured ttl
    pub fn issue(&self, user_id: i64) -> Result<String> {
        self.issue_with_ttl(user_id, self.ttl)
    }

    pub fn issue_with_ttl(&self, user_id: i64, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| Error::Internal(format!("failed to encode token: {e}")))
    }

    /// Check signature and expiry, returning the embedded subject id
    pub fn verify(&self, token: &str) -> Result<i64> {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: a token past its expiry is dead immediately.
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| Error::AuthFailInvalidToken)?;

        data.claims
            .sub
            .parse()
            .map_err(|_| Error::AuthFailInvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> TokenManager {
        TokenManager::new("unit-test-signing-key", 30)
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let tokens = manager();
        let token = tokens.issue(42).expect("issue failed");
        assert_eq!(tokens.verify(&token).expect("verify failed"), 42);
    }

    #[test]
    fn expired_token_fails() {
        let tokens = manager();
        let token = tokens
            .issue_with_ttl(42, Duration::seconds(-1))
            .expect("issue failed");
        assert!(matches!(
            tokens.verify(&token),
            Err(Error::AuthFailInvalidToken)
        ));
    }

    #[test]
    fn tampered_token_fails() {
        let tokens = manager();
        let mut token = tokens.issue(42).expect("issue failed");
        token.push('x');
        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn token_from_other_key_fails() {
        let token = TokenManager::new("some-other-key", 30)
            .issue(42)
            .expect("issue failed");
        assert!(manager().verify(&token).is_err());
    }

    #[test]
    fn garbage_token_fails() {
        assert!(manager().verify("not.a.token").is_err());
    }
}
