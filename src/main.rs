use std::sync::Arc;

use anyhow::{Context, Result};

use finsight::api::{create_router, AppState};
use finsight::config::Config;
use finsight::logging::init_tracing;
use finsight::market::MarketData;
use finsight::service::ForecastService;
use finsight::store::FsArtifactStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure config/default.toml exists or FINSIGHT_CONFIG points to a config file");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging)?;

    tracing::info!(
        bind = %config.server.bind,
        data_dir = %config.data.base_dir.display(),
        window_length = config.forecast.window_length,
        horizon = config.forecast.horizon,
        cache_artifacts = config.forecast.cache_artifacts,
        "Starting finsight {}",
        env!("CARGO_PKG_VERSION")
    );

    let store = Arc::new(FsArtifactStore::from_config(&config));
    let forecasts = Arc::new(ForecastService::new(
        config.forecast.clone(),
        store.clone(),
        store,
    ));
    let market = Arc::new(MarketData::new(config.market.clone()));
    let router = create_router(Arc::new(AppState::new(forecasts, market)));

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
            tracing::info!("Ctrl+C received");
        })
        .await
        .context("server error")?;

    tracing::info!("Shutdown complete");
    Ok(())
}
