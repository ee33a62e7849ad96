//! Session token issuance and validation.
//!
//! Tokens are stateless HS256 JWTs carrying the username as subject. There is
//! no refresh and no server-side revocation: a token is valid until its
//! expiry, then permanently rejected.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::errors::{AuthErrorKind, Error, Result};

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// Issues and validates session tokens with a process-wide signing secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl_minutes: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token is rejected the moment `now >= exp`.
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Issue a signed token for the given username, expiring after the
    /// configured TTL.
    pub fn issue(&self, username: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| Error::internal(format!("Failed to sign session token: {}", e)))
    }

    /// Decode and validate a token, returning its claims.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    Error::auth("Session token has expired", AuthErrorKind::ExpiredToken)
                }
                _ => Error::auth("Invalid session token", AuthErrorKind::InvalidToken),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn issue_then_decode_returns_subject() {
        let service = TokenService::new(SECRET, 30);
        let token = service.issue("admin").unwrap();
        let claims = service.decode(&token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn expired_token_rejected() {
        let service = TokenService::new(SECRET, 30);
        let now = Utc::now().timestamp();
        let stale =
            Claims { sub: "admin".to_string(), iat: now - 3600, exp: now - 1800 };
        let token =
            encode(&Header::default(), &stale, &EncodingKey::from_secret(SECRET)).unwrap();

        let err = service.decode(&token).unwrap_err();
        match err {
            Error::Auth { kind, .. } => assert_eq!(kind, AuthErrorKind::ExpiredToken),
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[test]
    fn wrong_secret_rejected() {
        let issuer = TokenService::new(b"another-secret-another-secret-xx", 30);
        let verifier = TokenService::new(SECRET, 30);
        let token = issuer.issue("admin").unwrap();

        let err = verifier.decode(&token).unwrap_err();
        match err {
            Error::Auth { kind, .. } => assert_eq!(kind, AuthErrorKind::InvalidToken),
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[test]
    fn garbage_token_rejected() {
        let service = TokenService::new(SECRET, 30);
        assert!(service.decode("not.a.jwt").is_err());
        assert!(service.decode("").is_err());
    }
}
