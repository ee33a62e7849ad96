//! Secrets backend that shells out to the local `podman` binary.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::config::{BackendMode, PodmanConfig};
use crate::errors::{Error, Result};
use crate::observability::metrics;

use super::types::{detail_from_nested, FlatSecret, SecretDetail, SecretSummary};
use super::SecretsBackend;

/// Executes Podman operations via `tokio::process`. Stdout is parsed as
/// JSON where the subcommand supports `--format json`; secret payloads are
/// piped through stdin so they never appear in an argv.
pub struct CliBackend {
    host: String,
    connection: String,
}

impl CliBackend {
    pub fn new(config: &PodmanConfig) -> Self {
        Self { host: config.host.clone(), connection: config.connection.clone() }
    }

    /// Base arguments applied before every subcommand. `--host` wins over
    /// `--connection` when both are configured.
    fn base_args(&self) -> Vec<String> {
        if !self.host.is_empty() {
            vec!["--host".to_string(), self.host.clone()]
        } else if !self.connection.is_empty() {
            vec!["--connection".to_string(), self.connection.clone()]
        } else {
            Vec::new()
        }
    }

    async fn run(&self, args: &[&str], stdin_data: Option<&[u8]>) -> Result<String> {
        let mut command = Command::new("podman");
        command.args(self.base_args()).args(args);
        command.stdout(Stdio::piped()).stderr(Stdio::piped());
        if stdin_data.is_some() {
            command.stdin(Stdio::piped());
        } else {
            command.stdin(Stdio::null());
        }

        debug!(args = ?args, "spawning podman");
        let mut child = command.spawn().map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                Error::upstream_unavailable("podman is not installed or not in PATH")
            } else {
                Error::upstream_unavailable(format!("failed to spawn podman: {}", err))
            }
        })?;

        if let Some(data) = stdin_data {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| Error::internal("podman child process has no stdin handle"))?;
            stdin.write_all(data).await?;
            drop(stdin);
        }

        let output = child.wait_with_output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            metrics::record_backend_call("cli", "error");
            return Err(Error::command_failed(if stderr.is_empty() {
                format!("podman exited with {}", output.status)
            } else {
                stderr
            }));
        }

        metrics::record_backend_call("cli", "success");
        Ok(stdout)
    }
}

/// Remap a non-zero exit to a 404 when stderr says the secret does not exist.
fn not_found_or(err: Error, id: &str) -> Error {
    match &err {
        Error::Upstream { message, .. } if message.contains("no such secret") => {
            Error::not_found("Secret", id)
        }
        _ => err,
    }
}

#[async_trait]
impl SecretsBackend for CliBackend {
    #[instrument(skip(self))]
    async fn list_secrets(&self) -> Result<Vec<SecretSummary>> {
        let stdout = self.run(&["secret", "ls", "--format", "json"], None).await?;
        let stdout = stdout.trim();
        // Older podman prints "null" instead of an empty array.
        if stdout.is_empty() || stdout == "null" {
            return Ok(Vec::new());
        }
        let rows: Vec<FlatSecret> = serde_json::from_str(stdout).map_err(|err| {
            Error::upstream_unavailable(format!("unparseable podman output: {}", err))
        })?;
        Ok(rows.into_iter().map(SecretSummary::from).collect())
    }

    #[instrument(skip(self, data))]
    async fn create_secret(&self, name: &str, data: &str, driver: &str) -> Result<String> {
        let stdout = self
            .run(
                &["secret", "create", "--driver", driver, name, "-"],
                Some(data.as_bytes()),
            )
            .await?;
        // podman prints the new secret id on stdout.
        Ok(stdout.trim().to_string())
    }

    #[instrument(skip(self))]
    async fn inspect_secret(&self, id: &str) -> Result<SecretDetail> {
        let stdout = self
            .run(&["secret", "inspect", id], None)
            .await
            .map_err(|err| not_found_or(err, id))?;

        let mut entries: Vec<serde_json::Value> =
            serde_json::from_str(stdout.trim()).map_err(|err| {
                Error::upstream_unavailable(format!("unparseable podman output: {}", err))
            })?;
        if entries.is_empty() {
            return Err(Error::not_found("Secret", id));
        }
        detail_from_nested(entries.remove(0))
    }

    #[instrument(skip(self))]
    async fn delete_secret(&self, id: &str) -> Result<()> {
        self.run(&["secret", "rm", id], None).await.map_err(|err| not_found_or(err, id))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn runtime_version(&self) -> Result<String> {
        let stdout = self.run(&["version", "--format", "json"], None).await?;
        let value: serde_json::Value = serde_json::from_str(stdout.trim()).map_err(|err| {
            Error::upstream_unavailable(format!("unparseable podman output: {}", err))
        })?;
        value["Client"]["Version"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::upstream_unavailable("podman version output missing Client.Version"))
    }

    fn mode(&self) -> BackendMode {
        BackendMode::Cli
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::UpstreamKind;

    #[test]
    fn host_takes_precedence_over_connection() {
        let backend = CliBackend {
            host: "unix:///run/podman.sock".to_string(),
            connection: "remote".to_string(),
        };
        assert_eq!(backend.base_args(), vec!["--host", "unix:///run/podman.sock"]);

        let backend = CliBackend { host: String::new(), connection: "remote".to_string() };
        assert_eq!(backend.base_args(), vec!["--connection", "remote"]);

        let backend = CliBackend { host: String::new(), connection: String::new() };
        assert!(backend.base_args().is_empty());
    }

    #[test]
    fn missing_secret_stderr_becomes_not_found() {
        let err = not_found_or(Error::command_failed("Error: no such secret abc"), "abc");
        assert!(matches!(err, Error::NotFound { .. }));

        let err = not_found_or(Error::command_failed("Error: secret in use"), "abc");
        assert!(matches!(
            err,
            Error::Upstream { kind: UpstreamKind::CommandFailed, .. }
        ));
    }
}
