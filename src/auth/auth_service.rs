//! Bearer token validation for protected requests.

use std::sync::Arc;

use tracing::{field, instrument};

use crate::auth::models::{AuthError, CurrentUser};
use crate::auth::token::TokenService;
use crate::errors::{AuthErrorKind, Error};
use crate::observability::metrics;
use crate::storage::repositories::{SqlxUserRepository, UserRepository};
use crate::storage::DbPool;

/// Validates `Authorization: Bearer` headers and resolves the token subject
/// against the credential store. The lookup runs on every protected request;
/// validation results are never cached.
#[derive(Clone)]
pub struct AuthService {
    tokens: TokenService,
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(tokens: TokenService, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }

    pub fn with_sqlx(tokens: TokenService, pool: DbPool) -> Self {
        Self::new(tokens, Arc::new(SqlxUserRepository::new(pool)))
    }

    #[instrument(skip(self, header), fields(username = field::Empty))]
    pub async fn authenticate(&self, header: &str) -> Result<CurrentUser, AuthError> {
        let header = header.trim();
        if header.is_empty() {
            metrics::record_authentication("missing_bearer");
            return Err(AuthError::MissingBearer);
        }

        let Some(token) = header.strip_prefix("Bearer ") else {
            metrics::record_authentication("malformed");
            return Err(AuthError::MalformedBearer);
        };

        let claims = self.tokens.decode(token.trim()).map_err(|err| match err {
            Error::Auth { kind: AuthErrorKind::ExpiredToken, .. } => {
                metrics::record_authentication("expired");
                AuthError::ExpiredToken
            }
            _ => {
                metrics::record_authentication("invalid");
                AuthError::InvalidToken
            }
        })?;

        let user = match self.users.find_by_username(&claims.sub).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                metrics::record_authentication("unknown_user");
                return Err(AuthError::UnknownUser);
            }
            Err(err) => {
                metrics::record_authentication("error");
                return Err(AuthError::Persistence(err));
            }
        };

        tracing::Span::current().record("username", user.username.as_str());
        metrics::record_authentication("success");

        Ok(CurrentUser { id: user.id, username: user.username, created_at: user.created_at })
    }
}
