//! Data models used by the authentication layer.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::errors::Error as PodsecError;

/// The authenticated user attached to a request after middleware validation.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Why authentication of a request failed.
///
/// Every variant except `Persistence` maps to a uniform 401 at the API
/// boundary; callers cannot distinguish an unknown user from a bad token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingBearer,
    #[error("malformed authorization header")]
    MalformedBearer,
    #[error("invalid session token")]
    InvalidToken,
    #[error("session token has expired")]
    ExpiredToken,
    #[error("token subject no longer exists")]
    UnknownUser,
    #[error("credential store unavailable: {0}")]
    Persistence(#[source] PodsecError),
}
