//! Canonical secret shapes and normalization of the raw backend schemas.
//!
//! The CLI's `secret ls --format json` emits flat objects, while both the
//! remote API (list and inspect) and the CLI's `secret inspect` nest `Name`
//! and `Driver` inside a `Spec` object. Everything is flattened into one
//! canonical shape before it leaves the transport layer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const DEFAULT_DRIVER: &str = "file";

/// Canonical list entry for a secret. Field names mirror the Podman schema
/// the frontend already consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SecretSummary {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Driver")]
    pub driver: String,
    #[serde(rename = "CreatedAt")]
    pub created_at: String,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: String,
}

/// Canonical inspect result: the summary fields plus the runtime's raw `Spec`
/// object for callers that need driver options or labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SecretDetail {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Driver")]
    pub driver: String,
    #[serde(rename = "CreatedAt")]
    pub created_at: String,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: String,
    #[serde(rename = "Spec")]
    #[schema(value_type = Object)]
    pub spec: serde_json::Value,
}

/// Flat row as printed by `podman secret ls --format json`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FlatSecret {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Driver", default)]
    pub driver: String,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: String,
    #[serde(rename = "UpdatedAt", default)]
    pub updated_at: String,
}

/// Nested shape shared by the remote API and `podman secret inspect`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NestedSecret {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: String,
    #[serde(rename = "UpdatedAt", default)]
    pub updated_at: String,
    #[serde(rename = "Spec", default)]
    pub spec: NestedSpec,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NestedSpec {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Driver", default)]
    pub driver: NestedDriver,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NestedDriver {
    #[serde(rename = "Name", default)]
    pub name: String,
}

fn driver_or_default(driver: String) -> String {
    if driver.is_empty() {
        DEFAULT_DRIVER.to_string()
    } else {
        driver
    }
}

impl From<FlatSecret> for SecretSummary {
    fn from(raw: FlatSecret) -> Self {
        SecretSummary {
            id: raw.id,
            name: raw.name,
            driver: driver_or_default(raw.driver),
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

impl From<NestedSecret> for SecretSummary {
    fn from(raw: NestedSecret) -> Self {
        SecretSummary {
            id: raw.id,
            name: raw.spec.name,
            driver: driver_or_default(raw.spec.driver.name),
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

/// Flatten one nested inspect payload into the canonical detail shape.
/// A payload that does not fit the schema means the backend is garbled,
/// not that this service misbehaved.
pub(crate) fn detail_from_nested(value: serde_json::Value) -> crate::errors::Result<SecretDetail> {
    let spec = value.get("Spec").cloned().unwrap_or(serde_json::Value::Null);
    let raw: NestedSecret = serde_json::from_value(value).map_err(|err| {
        crate::errors::Error::upstream_unavailable(format!("unparseable secret payload: {}", err))
    })?;
    let summary = SecretSummary::from(raw);
    Ok(SecretDetail {
        id: summary.id,
        name: summary.name,
        driver: summary.driver,
        created_at: summary.created_at,
        updated_at: summary.updated_at,
        spec,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_and_nested_rows_normalize_identically() {
        let flat = json!({
            "ID": "abc123",
            "Name": "db-password",
            "Driver": "file",
            "CreatedAt": "2026-01-01T00:00:00Z",
            "UpdatedAt": "2026-01-02T00:00:00Z"
        });
        let nested = json!({
            "ID": "abc123",
            "CreatedAt": "2026-01-01T00:00:00Z",
            "UpdatedAt": "2026-01-02T00:00:00Z",
            "Spec": {
                "Name": "db-password",
                "Driver": { "Name": "file", "Options": {} },
                "Labels": {}
            }
        });

        let from_flat: SecretSummary =
            serde_json::from_value::<FlatSecret>(flat).unwrap().into();
        let from_nested: SecretSummary =
            serde_json::from_value::<NestedSecret>(nested).unwrap().into();

        assert_eq!(from_flat, from_nested);
    }

    #[test]
    fn missing_driver_defaults_to_file() {
        let nested = json!({
            "ID": "abc",
            "CreatedAt": "x",
            "UpdatedAt": "y",
            "Spec": { "Name": "s" }
        });
        let summary: SecretSummary =
            serde_json::from_value::<NestedSecret>(nested).unwrap().into();
        assert_eq!(summary.driver, "file");
    }

    #[test]
    fn detail_keeps_raw_spec() {
        let nested = json!({
            "ID": "abc",
            "CreatedAt": "x",
            "UpdatedAt": "y",
            "Spec": {
                "Name": "s",
                "Driver": { "Name": "file", "Options": {"path": "/run"} }
            }
        });
        let detail = detail_from_nested(nested.clone()).unwrap();
        assert_eq!(detail.name, "s");
        assert_eq!(detail.spec, nested["Spec"]);
    }

    #[test]
    fn mistyped_payload_is_an_upstream_failure() {
        let bad = json!({ "ID": 42 });
        let err = detail_from_nested(bad).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::Error::Upstream {
                kind: crate::errors::UpstreamKind::Unavailable,
                ..
            }
        ));
    }

    #[test]
    fn canonical_serialization_uses_podman_field_names() {
        let summary = SecretSummary {
            id: "abc".into(),
            name: "s".into(),
            driver: "file".into(),
            created_at: "x".into(),
            updated_at: "y".into(),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["ID"], "abc");
        assert_eq!(value["Name"], "s");
        assert_eq!(value["Driver"], "file");
    }
}
