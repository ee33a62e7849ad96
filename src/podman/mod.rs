//! Dual-transport access to Podman's secret subsystem.
//!
//! One logical operation set, two interchangeable backends: local `podman`
//! subprocess execution ([`cli::CliBackend`]) or the remote libpod HTTP API
//! ([`http::HttpBackend`]). The backend is chosen once at startup from
//! [`PodmanConfig`]; request handlers never branch on the transport.

pub mod cli;
pub mod http;
pub mod service;
pub mod types;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{BackendMode, PodmanConfig};
use crate::errors::Result;
use types::{SecretDetail, SecretSummary};

/// The operations this service proxies to the Podman runtime.
///
/// Both implementations return the same canonical shapes regardless of how
/// the raw backend schema differs; see [`types`].
#[async_trait]
pub trait SecretsBackend: Send + Sync {
    /// List all secrets known to the runtime.
    async fn list_secrets(&self) -> Result<Vec<SecretSummary>>;

    /// Create a secret, returning the id the runtime assigned.
    async fn create_secret(&self, name: &str, data: &str, driver: &str) -> Result<String>;

    /// Fetch full detail for one secret.
    async fn inspect_secret(&self, id: &str) -> Result<SecretDetail>;

    /// Remove a secret.
    async fn delete_secret(&self, id: &str) -> Result<()>;

    /// Runtime version string, used for health reporting.
    async fn runtime_version(&self) -> Result<String>;

    /// Which transport this backend uses.
    fn mode(&self) -> BackendMode;
}

/// Construct the backend selected by the configuration.
pub fn backend_from_config(config: &PodmanConfig) -> Result<Arc<dyn SecretsBackend>> {
    Ok(match config.mode() {
        BackendMode::RemoteApi => Arc::new(http::HttpBackend::new(
            config.api_base_url(),
            config.request_timeout(),
        )?),
        BackendMode::Cli => Arc::new(cli::CliBackend::new(config)),
    })
}
