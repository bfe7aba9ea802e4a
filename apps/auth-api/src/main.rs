use axum_helpers::server::{close_redis, create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    // Redis is the single source of truth for session state; retry the
    // initial connection to ride out container start-up races
    let redis = database::redis::connect_from_config_with_retry(config.redis.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("Redis connection failed: {}", e))?;

    let state = AppState::new(config.clone(), redis.clone());

    // API routes (nested under /api by create_router) plus the readiness probe
    let api_routes = api::routes(&state).merge(api::ready_router(state.clone()));

    let router = create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router.merge(health_router(config.app));

    info!("{} {} listening", config.app.name, config.app.version);

    let cleanup = async move {
        close_redis(redis, "main").await;
    };

    create_production_app(app, &config.server, Duration::from_secs(30), cleanup).await?;

    Ok(())
}
