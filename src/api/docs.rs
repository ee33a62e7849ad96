//! OpenAPI document and Swagger UI.

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::routes::ApiState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PodSec API",
        description = "Authenticated management of Podman secrets over local CLI or remote HTTP backends"
    ),
    paths(
        crate::api::handlers::health::root,
        crate::api::handlers::health::health,
        crate::api::handlers::auth::login,
        crate::api::handlers::auth::me,
        crate::api::handlers::auth::change_password,
        crate::api::handlers::secrets::list_secrets,
        crate::api::handlers::secrets::create_secret,
        crate::api::handlers::secrets::bulk_create_secrets,
        crate::api::handlers::secrets::inspect_secret,
        crate::api::handlers::secrets::delete_secret,
    ),
    components(schemas(
        crate::api::error::ErrorBody,
        crate::api::handlers::auth::LoginRequest,
        crate::api::handlers::auth::TokenResponse,
        crate::api::handlers::auth::UserResponse,
        crate::api::handlers::auth::ChangePasswordRequest,
        crate::api::handlers::auth::MessageResponse,
        crate::api::handlers::health::ServiceInfo,
        crate::api::handlers::secrets::CreateSecretRequest,
        crate::api::handlers::secrets::BulkCreateRequest,
        crate::podman::service::CreatedSecret,
        crate::podman::service::SecretInput,
        crate::podman::service::BulkOutcome,
        crate::podman::service::BulkEntryOk,
        crate::podman::service::BulkEntryErr,
        crate::podman::service::HealthReport,
        crate::podman::types::SecretSummary,
        crate::podman::types::SecretDetail,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Service and backend health"),
        (name = "auth", description = "Login and session management"),
        (name = "secrets", description = "Podman secret management")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build(),
                ),
            );
        }
    }
}

/// Swagger UI router mounted at `/docs`.
pub fn router() -> Router<ApiState> {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
