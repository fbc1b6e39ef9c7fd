use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future::join_all;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tracing::{debug, info, instrument, warn};

use crate::cache::PersistentCache;
use crate::config::WeatherConfig;
use crate::models::{CITIES, City, DailyForecast};
use crate::{Result, WeatherWiseError};

pub mod open_meteo;

/// Source of daily forecasts for the web layer
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn daily_forecast(&self, city: &City) -> Result<Vec<DailyForecast>>;
}

/// Open-Meteo client with a persistent response cache and transient retries
pub struct WeatherClient {
    client: ClientWithMiddleware,
    base_url: String,
    cache: Option<Arc<PersistentCache>>,
    ttl: Duration,
}

impl WeatherClient {
    pub fn new(
        config: &WeatherConfig,
        cache: Option<Arc<PersistentCache>>,
        ttl: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("WeatherWise/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let min_backoff = Duration::from_millis(config.backoff_base_ms);
        let max_backoff = min_backoff * 2u32.pow(config.max_retries.clamp(1, 10));
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(min_backoff, max_backoff)
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            cache,
            ttl,
        })
    }

    /// Raw forecast body for a city, served from cache while fresh.
    #[instrument(skip(self, city), fields(city = city.name))]
    pub async fn fetch_payload(&self, city: &City) -> Result<String> {
        let url = open_meteo::forecast_url(&self.base_url, city);
        let key = format!("forecast:{url}");

        if let Some(cache) = &self.cache {
            match cache.lookup(&key).await {
                Ok(Some(body)) => {
                    debug!("Serving forecast from cache");
                    return Ok(body);
                }
                Ok(None) => {}
                Err(e) => warn!("Cache lookup failed, calling the API: {e:#}"),
            }
        }

        let body = self.fetch_from_api(city, &url).await?;
        // Only well-formed forecasts are cached
        open_meteo::parse_daily_forecasts(&body)?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.store(&key, body.clone(), self.ttl).await {
                warn!("Failed to store forecast in cache: {e:#}");
            }
        }

        Ok(body)
    }

    async fn fetch_from_api(&self, city: &City, url: &str) -> Result<String> {
        info!(
            "Pulling weather data for {} at lat/lon: {}",
            city.name,
            city.format_coordinates()
        );
        let start_time = Instant::now();

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let reason = serde_json::from_str::<open_meteo::ErrorResponse>(&body)
                .map(|e| e.reason)
                .unwrap_or(body);
            return Err(WeatherWiseError::upstream(format!(
                "OpenMeteo request for {} failed with status {status}: {reason}",
                city.name
            )));
        }

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved forecast for {} in {:.3}s",
            city.name,
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow API response detected: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(body)
    }
}

#[async_trait]
impl ForecastProvider for WeatherClient {
    async fn daily_forecast(&self, city: &City) -> Result<Vec<DailyForecast>> {
        let body = self.fetch_payload(city).await?;
        open_meteo::parse_daily_forecasts(&body)
    }
}

/// Fetch every city once so first page views hit the cache.
/// Returns the number of cities that loaded.
pub async fn warm_up(provider: &dyn ForecastProvider) -> usize {
    let results = join_all(CITIES.iter().map(|city| async move {
        (city, provider.daily_forecast(city).await)
    }))
    .await;

    results
        .into_iter()
        .filter(|(city, result)| match result {
            Ok(days) => {
                debug!("Warmed {} with {} days", city.name, days.len());
                true
            }
            Err(e) => {
                warn!("Could not prefetch {}: {e}", city.name);
                false
            }
        })
        .count()
}
