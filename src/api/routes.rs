//! Router assembly and shared API state.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::api::handlers::{auth, health, secrets};
use crate::auth::middleware::authenticate;
use crate::auth::{AuthService, TokenService};
use crate::config::ServerConfig;
use crate::podman::service::SecretsService;
use crate::storage::DbPool;

/// State shared by all handlers.
#[derive(Clone)]
pub struct ApiState {
    pub pool: DbPool,
    pub token_service: TokenService,
    pub auth_service: Arc<AuthService>,
    pub secrets: Arc<SecretsService>,
}

impl ApiState {
    pub fn new(
        pool: DbPool,
        token_service: TokenService,
        auth_service: Arc<AuthService>,
        secrets: Arc<SecretsService>,
    ) -> Self {
        Self { pool, token_service, auth_service, secrets }
    }
}

/// Build the full application router: public routes, bearer-protected
/// routes, API docs, and the CORS and trace layers.
pub fn build_router(state: ApiState, server_config: &ServerConfig) -> Router {
    let public = Router::new()
        .route("/", get(health::root))
        .route("/api/health", get(health::health))
        .route("/api/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/change-password", post(auth::change_password))
        .route("/api/secrets", get(secrets::list_secrets).post(secrets::create_secret))
        .route("/api/secrets/bulk", post(secrets::bulk_create_secrets))
        .route("/api/secrets/{id}", get(secrets::inspect_secret).delete(secrets::delete_secret))
        .layer(middleware::from_fn_with_state(state.auth_service.clone(), authenticate));

    let mut router = public
        .merge(protected)
        .merge(crate::api::docs::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if server_config.enable_cors {
        router = router.layer(cors_layer(&server_config.cors_origins));
    }

    router
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(parsed))
}
