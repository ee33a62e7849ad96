use podsec::api::start_api_server;
use podsec::config::AppConfig;
use podsec::observability::init_tracing;
use podsec::startup::build_state;
use podsec::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(&config.observability)?;

    info!(
        app_name = podsec::APP_NAME,
        version = podsec::VERSION,
        "starting PodSec API server"
    );

    let state = build_state(&config).await?;
    start_api_server(state, &config.server).await
}
