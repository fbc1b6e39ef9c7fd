//! Page handlers: a city selection comes in, the forecast is (re)loaded and
//! the matching layout is rendered.

use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{info, warn};

use super::{AppState, layout};
use crate::models::City;
use crate::{Result, WeatherWiseError};

#[derive(Debug, Default, Deserialize)]
pub struct CitySelection {
    pub city: Option<String>,
}

impl CitySelection {
    /// The selected city, or the default when none was chosen
    pub fn resolve(&self) -> Result<&'static City> {
        match self.city.as_deref().filter(|c| !c.trim().is_empty()) {
            None => Ok(City::default_city()),
            Some(key) => City::find(key)
                .ok_or_else(|| WeatherWiseError::unknown_city(key)),
        }
    }
}

fn not_found_response(err: &WeatherWiseError) -> Response {
    (err.status_code(), Html(layout::not_found_page(&err.user_message()))).into_response()
}

pub async fn detail(
    State(state): State<AppState>,
    Query(selection): Query<CitySelection>,
) -> Response {
    let city = match selection.resolve() {
        Ok(city) => city,
        Err(e) => return not_found_response(&e),
    };
    info!("Updating detailed forecast for {}", city.display_name);

    let forecast = state.load_forecast(city).await;
    let status = status_for(&forecast);
    let html = layout::detail_page(
        city,
        forecast.as_deref().map_err(WeatherWiseError::user_message),
        state.refresh_interval_seconds,
    );
    (status, Html(html)).into_response()
}

pub async fn summary(
    State(state): State<AppState>,
    Query(selection): Query<CitySelection>,
) -> Response {
    let city = match selection.resolve() {
        Ok(city) => city,
        Err(e) => return not_found_response(&e),
    };
    info!("Updating 3-day summary for {}", city.display_name);

    let forecast = state.load_forecast(city).await;
    let status = status_for(&forecast);
    let html = layout::summary_page(
        city,
        forecast.as_deref().map_err(WeatherWiseError::user_message),
    );
    (status, Html(html)).into_response()
}

pub async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(layout::not_found_page(&format!("No page at {}", uri.path()))),
    )
        .into_response()
}

fn status_for<T>(result: &Result<T>) -> StatusCode {
    match result {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            warn!("Forecast load failed: {e}");
            e.status_code()
        }
    }
}
