//! Secrets backend that talks to a remote Podman service over the libpod
//! HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::config::BackendMode;
use crate::errors::{Error, Result};
use crate::observability::metrics;

use super::types::{detail_from_nested, NestedSecret, SecretDetail, SecretSummary};
use super::SecretsBackend;

const LIBPOD_PREFIX: &str = "/v4.0.0/libpod";

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// `base_url` is the `http://host:port` form of the configured
    /// `tcp://` endpoint. Construction happens once at startup, so a
    /// client that cannot be built with its timeout is fatal.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|err| {
            Error::config(format!("Failed to build Podman API client: {}", err))
        })?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, LIBPOD_PREFIX, path)
    }

    /// Map transport failures to 503 and non-2xx responses to status errors.
    async fn check(&self, response: reqwest::Result<Response>) -> Result<Response> {
        let response = response.map_err(|err| {
            metrics::record_backend_call("http", "error");
            if err.is_timeout() {
                Error::upstream_unavailable("Podman API request timed out")
            } else {
                Error::upstream_unavailable(format!("Podman API unreachable: {}", err))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            metrics::record_backend_call("http", "error");
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream_status(status.as_u16(), body));
        }

        metrics::record_backend_call("http", "success");
        Ok(response)
    }
}

#[derive(Deserialize)]
struct CreateResponse {
    #[serde(rename = "ID")]
    id: String,
}

#[async_trait]
impl SecretsBackend for HttpBackend {
    #[instrument(skip(self))]
    async fn list_secrets(&self) -> Result<Vec<SecretSummary>> {
        let response = self.check(self.client.get(self.url("/secrets/json")).send().await).await?;

        // The API returns null rather than [] when no secrets exist.
        let rows: Option<Vec<NestedSecret>> = response
            .json()
            .await
            .map_err(|err| Error::upstream_unavailable(format!("invalid API response: {}", err)))?;
        Ok(rows.unwrap_or_default().into_iter().map(SecretSummary::from).collect())
    }

    #[instrument(skip(self, data))]
    async fn create_secret(&self, name: &str, data: &str, driver: &str) -> Result<String> {
        let body = json!({
            "data": base64::engine::general_purpose::STANDARD.encode(data),
            "driver": { "name": driver },
        });
        let response = self
            .check(
                self.client
                    .post(self.url("/secrets/create"))
                    .query(&[("name", name)])
                    .json(&body)
                    .send()
                    .await,
            )
            .await?;

        let created: CreateResponse = response
            .json()
            .await
            .map_err(|err| Error::upstream_unavailable(format!("invalid API response: {}", err)))?;
        Ok(created.id)
    }

    #[instrument(skip(self))]
    async fn inspect_secret(&self, id: &str) -> Result<SecretDetail> {
        let result = self
            .check(self.client.get(self.url(&format!("/secrets/{}/json", id))).send().await)
            .await;
        let response = result.map_err(|err| remap_missing(err, id))?;

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|err| Error::upstream_unavailable(format!("invalid API response: {}", err)))?;
        detail_from_nested(value)
    }

    #[instrument(skip(self))]
    async fn delete_secret(&self, id: &str) -> Result<()> {
        self.check(self.client.delete(self.url(&format!("/secrets/{}", id))).send().await)
            .await
            .map_err(|err| remap_missing(err, id))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn runtime_version(&self) -> Result<String> {
        let response = self.check(self.client.get(self.url("/version")).send().await).await?;
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|err| Error::upstream_unavailable(format!("invalid API response: {}", err)))?;
        value["Version"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::upstream_unavailable("version response missing Version field"))
    }

    fn mode(&self) -> BackendMode {
        BackendMode::RemoteApi
    }
}

/// Turn an upstream 404 into a resource-level not-found for the given id.
fn remap_missing(err: Error, id: &str) -> Error {
    match &err {
        Error::Upstream { kind: crate::errors::UpstreamKind::Status(status), .. }
            if *status == StatusCode::NOT_FOUND.as_u16() =>
        {
            Error::not_found("Secret", id)
        }
        _ => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::UpstreamKind;

    #[test]
    fn urls_carry_the_libpod_prefix() {
        let backend =
            HttpBackend::new("http://localhost:8888/".to_string(), Duration::from_secs(5))
                .unwrap();
        assert_eq!(backend.url("/secrets/json"), "http://localhost:8888/v4.0.0/libpod/secrets/json");
    }

    #[test]
    fn upstream_404_becomes_not_found() {
        let err = remap_missing(Error::upstream_status(404, "no such secret"), "abc");
        assert!(matches!(err, Error::NotFound { .. }));

        let err = remap_missing(Error::upstream_status(500, "boom"), "abc");
        assert!(matches!(err, Error::Upstream { kind: UpstreamKind::Status(500), .. }));
    }
}
