//! Wire-level tests for the remote libpod API backend.

use std::time::Duration;

use base64::Engine;
use podsec::config::BackendMode;
use podsec::errors::{Error, UpstreamKind};
use podsec::podman::http::HttpBackend;
use podsec::podman::SecretsBackend;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(server.uri(), Duration::from_secs(5)).expect("build backend")
}

#[tokio::test]
async fn list_normalizes_nested_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4.0.0/libpod/secrets/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "ID": "abc123",
                "CreatedAt": "2026-01-01T00:00:00Z",
                "UpdatedAt": "2026-01-02T00:00:00Z",
                "Spec": {
                    "Name": "db-password",
                    "Driver": { "Name": "file", "Options": {} }
                }
            },
            {
                "ID": "def456",
                "CreatedAt": "2026-01-03T00:00:00Z",
                "UpdatedAt": "2026-01-03T00:00:00Z",
                "Spec": { "Name": "api-key" }
            }
        ])))
        .mount(&server)
        .await;

    let secrets = backend_for(&server).list_secrets().await.unwrap();

    assert_eq!(secrets.len(), 2);
    assert_eq!(secrets[0].id, "abc123");
    assert_eq!(secrets[0].name, "db-password");
    assert_eq!(secrets[0].driver, "file");
    // Missing driver falls back to the default.
    assert_eq!(secrets[1].driver, "file");
}

#[tokio::test]
async fn list_treats_null_body_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4.0.0/libpod/secrets/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    let secrets = backend_for(&server).list_secrets().await.unwrap();
    assert!(secrets.is_empty());
}

#[tokio::test]
async fn create_sends_base64_payload_and_name_query() {
    let server = MockServer::start().await;
    let encoded = base64::engine::general_purpose::STANDARD.encode("hunter2");
    Mock::given(method("POST"))
        .and(path("/v4.0.0/libpod/secrets/create"))
        .and(query_param("name", "db-password"))
        .and(body_json(json!({
            "data": encoded,
            "driver": { "name": "file" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "ID": "abc123" })))
        .expect(1)
        .mount(&server)
        .await;

    let id =
        backend_for(&server).create_secret("db-password", "hunter2", "file").await.unwrap();
    assert_eq!(id, "abc123");
}

#[tokio::test]
async fn inspect_flattens_spec_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4.0.0/libpod/secrets/abc123/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ID": "abc123",
            "CreatedAt": "2026-01-01T00:00:00Z",
            "UpdatedAt": "2026-01-02T00:00:00Z",
            "Spec": {
                "Name": "db-password",
                "Driver": { "Name": "file", "Options": { "path": "/run/secrets" } }
            }
        })))
        .mount(&server)
        .await;

    let detail = backend_for(&server).inspect_secret("abc123").await.unwrap();

    assert_eq!(detail.id, "abc123");
    assert_eq!(detail.name, "db-password");
    assert_eq!(detail.driver, "file");
    assert_eq!(detail.spec["Driver"]["Options"]["path"], "/run/secrets");
}

#[tokio::test]
async fn upstream_404_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4.0.0/libpod/secrets/ghost/json"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such secret"))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v4.0.0/libpod/secrets/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such secret"))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    assert!(matches!(backend.inspect_secret("ghost").await.unwrap_err(), Error::NotFound { .. }));
    assert!(matches!(backend.delete_secret("ghost").await.unwrap_err(), Error::NotFound { .. }));
}

#[tokio::test]
async fn upstream_5xx_maps_to_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4.0.0/libpod/secrets/json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let err = backend_for(&server).list_secrets().await.unwrap_err();
    match err {
        Error::Upstream { kind: UpstreamKind::Status(500), .. } => {}
        other => panic!("expected status error, got {:?}", other),
    }
    assert_eq!(
        Error::upstream_status(500, "internal error").status_code(),
        503
    );
}

#[tokio::test]
async fn unreachable_endpoint_is_unavailable() {
    // Nothing listens on this port.
    let backend = HttpBackend::new("http://127.0.0.1:9".to_string(), Duration::from_secs(1))
        .expect("build backend");

    let err = backend.list_secrets().await.unwrap_err();
    assert!(matches!(err, Error::Upstream { kind: UpstreamKind::Unavailable, .. }));
}

#[tokio::test]
async fn version_extracts_version_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4.0.0/libpod/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Version": "5.2.1",
            "ApiVersion": "5.2.1"
        })))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    assert_eq!(backend.runtime_version().await.unwrap(), "5.2.1");
    assert_eq!(backend.mode(), BackendMode::RemoteApi);
}
