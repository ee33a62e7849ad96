//! Shared test harness: an in-process app wired to an in-memory database
//! and a scriptable fake secrets backend.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use podsec::api::{build_router, ApiState};
use podsec::auth::{AuthService, TokenService};
use podsec::config::{BackendMode, PodmanConfig, ServerConfig};
use podsec::errors::{Error, Result};
use podsec::podman::service::SecretsService;
use podsec::podman::types::{SecretDetail, SecretSummary};
use podsec::podman::SecretsBackend;
use podsec::startup::ensure_admin_user;

pub const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

#[derive(Clone)]
struct StoredSecret {
    id: String,
    name: String,
    driver: String,
}

/// In-memory secrets backend. Set `available` to false to simulate an
/// unreachable runtime.
pub struct FakeBackend {
    secrets: Mutex<BTreeMap<String, StoredSecret>>,
    pub available: bool,
    counter: Mutex<u64>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self { secrets: Mutex::new(BTreeMap::new()), available: true, counter: Mutex::new(0) }
    }

    pub fn unavailable() -> Self {
        Self { available: false, ..Self::new() }
    }

    fn check_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(Error::upstream_unavailable("podman is not installed or not in PATH"))
        }
    }
}

#[async_trait]
impl SecretsBackend for FakeBackend {
    async fn list_secrets(&self) -> Result<Vec<SecretSummary>> {
        self.check_available()?;
        Ok(self
            .secrets
            .lock()
            .unwrap()
            .values()
            .map(|s| SecretSummary {
                id: s.id.clone(),
                name: s.name.clone(),
                driver: s.driver.clone(),
                created_at: "2026-01-01T00:00:00Z".to_string(),
                updated_at: "2026-01-01T00:00:00Z".to_string(),
            })
            .collect())
    }

    async fn create_secret(&self, name: &str, _data: &str, driver: &str) -> Result<String> {
        self.check_available()?;
        let mut secrets = self.secrets.lock().unwrap();
        if secrets.values().any(|s| s.name == name) {
            return Err(Error::command_failed(format!("secret name \"{}\" already in use", name)));
        }
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;
        let id = format!("secret{:04}", counter);
        secrets.insert(
            id.clone(),
            StoredSecret { id: id.clone(), name: name.to_string(), driver: driver.to_string() },
        );
        Ok(id)
    }

    async fn inspect_secret(&self, id: &str) -> Result<SecretDetail> {
        self.check_available()?;
        let secrets = self.secrets.lock().unwrap();
        let stored = secrets.get(id).ok_or_else(|| Error::not_found("Secret", id))?;
        Ok(SecretDetail {
            id: stored.id.clone(),
            name: stored.name.clone(),
            driver: stored.driver.clone(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
            spec: serde_json::json!({
                "Name": stored.name,
                "Driver": { "Name": stored.driver }
            }),
        })
    }

    async fn delete_secret(&self, id: &str) -> Result<()> {
        self.check_available()?;
        let mut secrets = self.secrets.lock().unwrap();
        if secrets.remove(id).is_none() {
            return Err(Error::not_found("Secret", id));
        }
        Ok(())
    }

    async fn runtime_version(&self) -> Result<String> {
        self.check_available()?;
        Ok("5.2.1".to_string())
    }

    fn mode(&self) -> BackendMode {
        BackendMode::Cli
    }
}

pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_backend(FakeBackend::new()).await
    }

    pub async fn spawn_with_backend(backend: FakeBackend) -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect("sqlite::memory:")
            .await
            .expect("create sqlite pool");
        podsec::storage::run_migrations(&pool).await.expect("run migrations");
        ensure_admin_user(&pool).await.expect("seed admin user");

        let token_service = TokenService::new(TEST_SECRET.as_bytes(), 30);
        let auth_service = Arc::new(AuthService::with_sqlx(token_service.clone(), pool.clone()));
        let secrets =
            Arc::new(SecretsService::new(Arc::new(backend), PodmanConfig::default()));

        let state = ApiState::new(pool, token_service, auth_service, secrets);
        let server_config = ServerConfig { enable_cors: false, ..ServerConfig::default() };

        Self { router: build_router(state, &server_config) }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.expect("request failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is JSON")
        };
        (status, value)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, token, None).await
    }

    /// Log in as the seeded admin and return a bearer token.
    pub async fn login_as_admin(&self) -> String {
        let (status, body) = self
            .post(
                "/api/auth/login",
                None,
                serde_json::json!({ "username": "admin", "password": "admin" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "admin login failed: {}", body);
        body["access_token"].as_str().expect("access_token in response").to_string()
    }
}
