//! User repository for the credential store.
//!
//! Single-row create/read/update with a uniqueness constraint on `username`.
//! Users are never deleted by this service.

use crate::errors::{Error, Result};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;

/// A stored user record. The password hash never leaves the repository except
/// through [`UserRepository::find_with_password`].
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Look up a user by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Look up a user together with their password hash, for authentication
    async fn find_with_password(&self, username: &str) -> Result<Option<(User, String)>>;

    /// Fetch the stored password hash for a user id
    async fn get_password_hash(&self, id: i64) -> Result<Option<String>>;

    /// Replace a user's password hash
    async fn update_password(&self, id: i64, password_hash: String) -> Result<()>;
}

/// SQLite implementation of [`UserRepository`].
#[derive(Debug, Clone)]
pub struct SqlxUserRepository {
    pool: DbPool,
}

impl SqlxUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username), name = "db_create_user")]
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|err| Error::Database {
            source: err,
            context: format!("Failed to create user '{}'", user.username),
        })?
        .last_insert_rowid();

        Ok(User { id, username: user.username, created_at: now, updated_at: now })
    }

    #[instrument(skip(self), fields(username = %username), name = "db_find_user")]
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, created_at, updated_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::Database {
            source: err,
            context: "Failed to fetch user".to_string(),
        })?;

        Ok(row.map(User::from))
    }

    #[instrument(skip(self), fields(username = %username), name = "db_find_user_with_password")]
    async fn find_with_password(&self, username: &str) -> Result<Option<(User, String)>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, created_at, updated_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::Database {
            source: err,
            context: "Failed to fetch user with password".to_string(),
        })?;

        Ok(row.map(|r| {
            let hash = r.password_hash.clone();
            (User::from(r), hash)
        }))
    }

    #[instrument(skip(self), fields(user_id = id), name = "db_get_password_hash")]
    async fn get_password_hash(&self, id: i64) -> Result<Option<String>> {
        let hash =
            sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|err| Error::Database {
                    source: err,
                    context: "Failed to fetch password hash".to_string(),
                })?;

        Ok(hash)
    }

    #[instrument(skip(self, password_hash), fields(user_id = id), name = "db_update_password")]
    async fn update_password(&self, id: i64, password_hash: String) -> Result<()> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $1, updated_at = $2 WHERE id = $3")
                .bind(&password_hash)
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|err| Error::Database {
                    source: err,
                    context: "Failed to update password".to_string(),
                })?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("User", id.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> DbPool {
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect("sqlite::memory:")
            .await
            .expect("create sqlite pool");
        crate::storage::run_migrations(&pool).await.expect("run migrations");
        pool
    }

    #[tokio::test]
    async fn create_and_find_user() {
        let repo = SqlxUserRepository::new(test_pool().await);
        let created = repo
            .create_user(NewUser {
                username: "admin".to_string(),
                password_hash: "$argon2id$fake".to_string(),
            })
            .await
            .unwrap();

        let found = repo.find_by_username("admin").await.unwrap().expect("user exists");
        assert_eq!(found, created);
        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_rejected() {
        let repo = SqlxUserRepository::new(test_pool().await);
        let user =
            NewUser { username: "admin".to_string(), password_hash: "hash".to_string() };
        repo.create_user(user.clone()).await.unwrap();

        let err = repo.create_user(user).await.unwrap_err();
        assert!(matches!(err, Error::Database { .. }));
    }

    #[tokio::test]
    async fn update_password_replaces_hash() {
        let repo = SqlxUserRepository::new(test_pool().await);
        let user = repo
            .create_user(NewUser {
                username: "admin".to_string(),
                password_hash: "old".to_string(),
            })
            .await
            .unwrap();

        repo.update_password(user.id, "new".to_string()).await.unwrap();
        let hash = repo.get_password_hash(user.id).await.unwrap();
        assert_eq!(hash.as_deref(), Some("new"));

        let (_, via_lookup) =
            repo.find_with_password("admin").await.unwrap().expect("user exists");
        assert_eq!(via_lookup, "new");
    }

    #[tokio::test]
    async fn update_password_unknown_user() {
        let repo = SqlxUserRepository::new(test_pool().await);
        let err = repo.update_password(42, "hash".to_string()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
