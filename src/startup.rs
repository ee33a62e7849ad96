//! Wires configuration into running components: pool, migrations, the
//! bootstrap admin user, backend selection, and shared services.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::ApiState;
use crate::auth::{hashing, AuthService, TokenService};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::podman::backend_from_config;
use crate::podman::service::SecretsService;
use crate::storage::repositories::{NewUser, SqlxUserRepository, UserRepository};
use crate::storage::{create_pool, DbPool};

pub const BOOTSTRAP_USERNAME: &str = "admin";
const BOOTSTRAP_PASSWORD: &str = "admin";

/// Build the full API state from configuration.
pub async fn build_state(config: &AppConfig) -> Result<ApiState> {
    let pool = create_pool(&config.database).await?;
    ensure_admin_user(&pool).await?;

    let backend = backend_from_config(&config.podman)?;
    info!(mode = %backend.mode(), "secrets backend selected");

    let token_service =
        TokenService::new(config.auth.jwt_secret.as_bytes(), config.auth.token_ttl_minutes);
    let auth_service = Arc::new(AuthService::with_sqlx(token_service.clone(), pool.clone()));
    let secrets = Arc::new(SecretsService::new(backend, config.podman.clone()));

    Ok(ApiState::new(pool, token_service, auth_service, secrets))
}

/// Seed the default admin account on first start so the service is usable
/// out of the box. The password must be rotated immediately.
pub async fn ensure_admin_user(pool: &DbPool) -> Result<()> {
    let repo = SqlxUserRepository::new(pool.clone());

    if repo.find_by_username(BOOTSTRAP_USERNAME).await?.is_some() {
        return Ok(());
    }

    let password_hash = hashing::hash_password(BOOTSTRAP_PASSWORD)?;
    repo.create_user(NewUser {
        username: BOOTSTRAP_USERNAME.to_string(),
        password_hash,
    })
    .await?;

    warn!(
        username = BOOTSTRAP_USERNAME,
        "created default admin user with a well-known password; change it now"
    );
    Ok(())
}
