use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::models::{City, DailyForecast};
use crate::weather::ForecastProvider;
use crate::{Result as ForecastResult, WeatherWiseError};

pub mod api;
pub mod chart;
pub mod layout;
pub mod pages;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ForecastProvider>,
    /// Seconds between automatic reloads of the detail page
    pub refresh_interval_seconds: u64,
    /// Time a handler waits for the provider, retries included
    pub forecast_deadline: Duration,
}

impl AppState {
    pub fn new(provider: Arc<dyn ForecastProvider>, config: &ServerConfig) -> Self {
        Self {
            provider,
            refresh_interval_seconds: config.refresh_interval_seconds,
            forecast_deadline: config.forecast_deadline(),
        }
    }

    /// Load a city's forecast, giving up once the deadline passes so the
    /// caller still has time to render an error
    pub async fn load_forecast(&self, city: &City) -> ForecastResult<Vec<DailyForecast>> {
        tokio::time::timeout(self.forecast_deadline, self.provider.daily_forecast(city))
            .await
            .unwrap_or_else(|_| {
                Err(WeatherWiseError::upstream(format!(
                    "No forecast for {} within {}s",
                    city.display_name,
                    self.forecast_deadline.as_secs()
                )))
            })
    }
}

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(pages::detail))
        .route("/summary", get(pages::summary))
        .nest("/api", api::router())
        .nest_service("/assets", ServeDir::new(&config.assets_dir))
        .fallback(pages::not_found)
        .with_state(state)
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run(state: AppState, config: &ServerConfig) -> Result<()> {
    let app = router(state, config);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server stopped unexpectedly")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
