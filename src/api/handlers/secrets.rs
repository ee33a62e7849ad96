//! Secret CRUD endpoints. These proxy to whichever backend was selected at
//! startup; the handlers themselves are transport-agnostic.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::api::routes::ApiState;
use crate::podman::service::{BulkOutcome, CreatedSecret, SecretInput};
use crate::podman::types::{SecretDetail, SecretSummary};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSecretRequest {
    pub name: String,
    pub data: String,
    #[serde(default)]
    pub driver: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkCreateRequest {
    pub secrets: Vec<SecretInput>,
}

/// List all secrets.
#[utoipa::path(
    get,
    path = "/api/secrets",
    responses(
        (status = 200, description = "All secrets", body = Vec<SecretSummary>),
        (status = 503, description = "Backend unreachable", body = crate::api::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "secrets"
)]
pub async fn list_secrets(
    State(state): State<ApiState>,
) -> Result<Json<Vec<SecretSummary>>, ApiError> {
    Ok(Json(state.secrets.list().await?))
}

/// Create a secret.
#[utoipa::path(
    post,
    path = "/api/secrets",
    request_body = CreateSecretRequest,
    responses(
        (status = 201, description = "Secret created", body = CreatedSecret),
        (status = 400, description = "Invalid name or backend rejection", body = crate::api::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "secrets"
)]
pub async fn create_secret(
    State(state): State<ApiState>,
    Json(body): Json<CreateSecretRequest>,
) -> Result<(StatusCode, Json<CreatedSecret>), ApiError> {
    let created = state.secrets.create(&body.name, &body.data, body.driver.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Create a batch of secrets. Entries succeed or fail individually.
#[utoipa::path(
    post,
    path = "/api/secrets/bulk",
    request_body = BulkCreateRequest,
    responses(
        (status = 201, description = "Partitioned results", body = BulkOutcome)
    ),
    security(("bearer_auth" = [])),
    tag = "secrets"
)]
pub async fn bulk_create_secrets(
    State(state): State<ApiState>,
    Json(body): Json<BulkCreateRequest>,
) -> (StatusCode, Json<BulkOutcome>) {
    let outcome = state.secrets.bulk_create(body.secrets).await;
    (StatusCode::CREATED, Json(outcome))
}

/// Inspect one secret.
#[utoipa::path(
    get,
    path = "/api/secrets/{id}",
    params(("id" = String, Path, description = "Secret id or name")),
    responses(
        (status = 200, description = "Secret detail", body = SecretDetail),
        (status = 404, description = "No such secret", body = crate::api::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "secrets"
)]
pub async fn inspect_secret(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<SecretDetail>, ApiError> {
    Ok(Json(state.secrets.inspect(&id).await?))
}

/// Delete one secret.
#[utoipa::path(
    delete,
    path = "/api/secrets/{id}",
    params(("id" = String, Path, description = "Secret id or name")),
    responses(
        (status = 200, description = "Secret deleted", body = crate::api::handlers::auth::MessageResponse),
        (status = 404, description = "No such secret", body = crate::api::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "secrets"
)]
pub async fn delete_secret(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<crate::api::handlers::auth::MessageResponse>, ApiError> {
    state.secrets.delete(&id).await?;
    Ok(Json(crate::api::handlers::auth::MessageResponse {
        message: format!("Secret '{}' deleted successfully", id),
    }))
}
