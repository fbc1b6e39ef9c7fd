use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use weatherwise::web::{self, AppState};
use weatherwise::{PersistentCache, WeatherClient, WeatherWiseConfig, WeatherWiseError, logging, weather};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional config file path as the only argument
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = WeatherWiseConfig::load_from_path(config_path)?;

    logging::init(&config.logging)?;
    tracing::info!("Starting WeatherWise {}", weatherwise::VERSION);

    std::fs::create_dir_all(&config.cache.location).with_context(|| format!("Failed to create cache directory {}", config.cache.location))?;
    let cache = PersistentCache::open(&config.cache.location).map_err(|e| {
        WeatherWiseError::cache(format!(
            "Failed to open cache database at {}: {e:#}",
            config.cache.location
        ))
    })?;

    let client = WeatherClient::new(&config.weather, Some(Arc::new(cache)), config.cache.ttl())
        .context("Failed to create weather client")?;
    let provider: Arc<dyn weather::ForecastProvider> = Arc::new(client);

    let warmed = weather::warm_up(provider.as_ref()).await;
    tracing::info!("Prefetched forecasts for {warmed} cities");

    let state = AppState::new(provider, &config.server);
    web::run(state, &config.server).await
}
