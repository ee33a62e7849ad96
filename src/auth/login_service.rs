//! Login service for username/password authentication and password changes.

use std::sync::{Arc, LazyLock};

use tracing::{info, instrument, warn};

use crate::auth::hashing;
use crate::errors::{AuthErrorKind, Error, Result};
use crate::observability::metrics;
use crate::storage::repositories::{SqlxUserRepository, User, UserRepository};
use crate::storage::DbPool;

/// Pre-computed dummy hash for timing-safe user enumeration prevention.
/// When a non-existent username is used, we still run Argon2 verification
/// against this hash so the response time matches real verification.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hashing::hash_password("dummy_startup_value")
        .unwrap_or_else(|_| "$argon2id$v=19$m=768,t=1,p=1$dW5rbm93bg$dW5rbm93bg".to_string())
});

/// Service for credential verification and password maintenance.
#[derive(Clone)]
pub struct LoginService {
    users: Arc<dyn UserRepository>,
}

impl LoginService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub fn with_sqlx(pool: DbPool) -> Self {
        Self::new(Arc::new(SqlxUserRepository::new(pool)))
    }

    /// Authenticate a user by username and password.
    ///
    /// The failure signal never distinguishes an unknown username from a
    /// wrong password.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let Some((user, password_hash)) = self.users.find_with_password(username).await? else {
            // Burn the same verification cost as the real path.
            let _ = hashing::verify_password(password, &DUMMY_HASH);
            warn!(username = %username, "login attempt for non-existent user");
            metrics::record_authentication("invalid_credentials");
            return Err(Error::auth(
                "Incorrect username or password",
                AuthErrorKind::InvalidCredentials,
            ));
        };

        if !hashing::verify_password(password, &password_hash) {
            warn!(user_id = user.id, "login attempt with incorrect password");
            metrics::record_authentication("invalid_credentials");
            return Err(Error::auth(
                "Incorrect username or password",
                AuthErrorKind::InvalidCredentials,
            ));
        }

        metrics::record_authentication("success");
        info!(user_id = user.id, username = %user.username, "user logged in");
        Ok(user)
    }

    /// Change a user's password after verifying the current one.
    ///
    /// No mutation happens unless the current password verifies.
    #[instrument(skip(self, current_password, new_password), fields(user_id = user_id))]
    pub async fn change_password(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let stored_hash = self
            .users
            .get_password_hash(user_id)
            .await?
            .ok_or_else(|| Error::not_found("User", user_id.to_string()))?;

        if !hashing::verify_password(current_password, &stored_hash) {
            warn!(user_id = user_id, "password change with incorrect current password");
            return Err(Error::validation("Current password is incorrect"));
        }

        let new_hash = hashing::hash_password(new_password)?;
        self.users.update_password(user_id, new_hash).await?;

        info!(user_id = user_id, "password changed");
        Ok(())
    }
}
