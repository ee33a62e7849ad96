//! Health and root endpoints. Both are public and never fail: an
//! unreachable backend is reported in the body, not as an error status.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::routes::ApiState;
use crate::podman::service::HealthReport;

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub status: String,
    pub service: String,
}

/// Service banner.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service info", body = ServiceInfo)),
    tag = "health"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo { status: "healthy".to_string(), service: "PodSec API".to_string() })
}

/// Backend connectivity report.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Backend health", body = HealthReport)),
    tag = "health"
)]
pub async fn health(State(state): State<ApiState>) -> Json<HealthReport> {
    Json(state.secrets.health().await)
}
