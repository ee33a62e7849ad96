//! Service layer over the secrets backend: validation, bulk orchestration,
//! and health reporting.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::config::PodmanConfig;
use crate::errors::Result;

use super::types::{SecretDetail, SecretSummary};
use super::validation::validate_secret_name;
use super::SecretsBackend;

pub const DEFAULT_DRIVER: &str = "file";

/// Outcome of a single create.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedSecret {
    pub id: String,
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkEntryOk {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkEntryErr {
    pub name: String,
    pub error: String,
}

/// Partitioned result of a bulk create. A failed entry never aborts the
/// remaining ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BulkOutcome {
    pub success: Vec<BulkEntryOk>,
    pub failed: Vec<BulkEntryErr>,
}

/// One entry in a bulk create request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SecretInput {
    pub name: String,
    pub data: String,
    #[serde(default)]
    pub driver: Option<String>,
}

/// Backend health snapshot. Reporting never fails; an unreachable backend
/// shows up as `podman_available: false` with the error text.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthReport {
    pub podman_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub host: String,
    pub connection: String,
    pub mode: String,
}

#[derive(Clone)]
pub struct SecretsService {
    backend: Arc<dyn SecretsBackend>,
    config: PodmanConfig,
}

impl SecretsService {
    pub fn new(backend: Arc<dyn SecretsBackend>, config: PodmanConfig) -> Self {
        Self { backend, config }
    }

    pub async fn list(&self) -> Result<Vec<SecretSummary>> {
        self.backend.list_secrets().await
    }

    /// Create one secret after name validation.
    #[instrument(skip(self, data))]
    pub async fn create(&self, name: &str, data: &str, driver: Option<&str>) -> Result<CreatedSecret> {
        let name = validate_secret_name(name)?;
        let driver = driver.unwrap_or(DEFAULT_DRIVER);

        let id = self.backend.create_secret(&name, data, driver).await?;
        info!(secret_id = %id, secret_name = %name, "secret created");
        Ok(CreatedSecret {
            id,
            message: format!("Secret '{}' created successfully", name),
            name,
        })
    }

    /// Create a batch of secrets sequentially. Each entry succeeds or fails
    /// on its own; results are partitioned, never short-circuited.
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub async fn bulk_create(&self, entries: Vec<SecretInput>) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for entry in entries {
            match self.create(&entry.name, &entry.data, entry.driver.as_deref()).await {
                Ok(created) => {
                    outcome.success.push(BulkEntryOk { id: created.id, name: created.name });
                }
                Err(err) => {
                    warn!(secret_name = %entry.name, error = %err, "bulk entry failed");
                    outcome.failed.push(BulkEntryErr { name: entry.name, error: err.to_string() });
                }
            }
        }
        outcome
    }

    pub async fn inspect(&self, id: &str) -> Result<SecretDetail> {
        self.backend.inspect_secret(id).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.backend.delete_secret(id).await?;
        info!(secret_id = %id, "secret deleted");
        Ok(())
    }

    /// Probe the backend and report connectivity. Always returns a report.
    pub async fn health(&self) -> HealthReport {
        let mode = self.backend.mode().as_str().to_string();
        match self.backend.runtime_version().await {
            Ok(version) => HealthReport {
                podman_available: true,
                version: Some(version),
                error: None,
                host: self.config.host_label().to_string(),
                connection: self.config.connection_label().to_string(),
                mode,
            },
            Err(err) => HealthReport {
                podman_available: false,
                version: None,
                error: Some(err.to_string()),
                host: self.config.host_label().to_string(),
                connection: self.config.connection_label().to_string(),
                mode,
            },
        }
    }
}
