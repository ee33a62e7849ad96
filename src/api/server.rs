//! HTTP server startup and graceful shutdown.

use tokio::net::TcpListener;
use tracing::info;

use crate::api::routes::{build_router, ApiState};
use crate::config::ServerConfig;
use crate::errors::{Error, Result};

/// Bind and serve the API until ctrl-c.
pub async fn start_api_server(state: ApiState, server_config: &ServerConfig) -> Result<()> {
    let router = build_router(state, server_config);
    let address = server_config.bind_address();

    let listener = TcpListener::bind(&address).await.map_err(|err| {
        Error::config_with_source(format!("Failed to bind to {}", address), Box::new(err))
    })?;

    info!(address = %address, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| Error::internal(format!("API server error: {}", err)))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
