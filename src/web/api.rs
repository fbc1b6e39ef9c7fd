use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::AppState;
use crate::models::{CITIES, City, DailyForecast};
use crate::suggestions::{self, ActivitySuggestion, DaySuggestion, FoodSuggestion};
use crate::{Result, VERSION, WeatherWiseError};

#[derive(Serialize, Deserialize)]
pub struct ApiCity {
    pub slug: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize)]
pub struct ApiForecastDay {
    pub date: NaiveDate,
    pub label: String,
    pub max_temp_f: f32,
    pub min_temp_f: f32,
    pub rain_in: f32,
    pub wind_mph: f32,
    pub weather_code: u8,
    pub description: String,
    pub precipitation_probability: Option<u8>,
    pub cloud_cover: Option<u8>,
    pub activity: ActivitySuggestion,
    pub food: FoodSuggestion,
    pub price_range: String,
}

#[derive(Serialize)]
pub struct ApiForecast {
    pub city: ApiCity,
    pub days: Vec<ApiForecastDay>,
}

impl From<&City> for ApiCity {
    fn from(city: &City) -> Self {
        Self {
            slug: city.slug.to_string(),
            name: city.display_name.to_string(),
            latitude: city.latitude,
            longitude: city.longitude,
        }
    }
}

impl ApiForecastDay {
    fn new(day: &DailyForecast, suggestion: DaySuggestion) -> Self {
        Self {
            date: day.date,
            label: day.date_label(),
            max_temp_f: day.max_temp_f,
            min_temp_f: day.min_temp_f,
            rain_in: day.rain_in,
            wind_mph: day.wind_mph,
            weather_code: day.weather_code.0,
            description: day.description().to_string(),
            precipitation_probability: day.precipitation_probability,
            cloud_cover: day.cloud_cover,
            activity: suggestion.activity,
            food: suggestion.food,
            price_range: suggestion.price_range.to_string(),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/cities", get(get_cities))
        .route("/forecast/{slug}", get(get_forecast))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": VERSION }))
}

async fn get_cities() -> Json<Vec<ApiCity>> {
    Json(CITIES.iter().map(ApiCity::from).collect())
}

async fn get_forecast(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiForecast>> {
    let city = City::find(&slug)
        .ok_or_else(|| WeatherWiseError::unknown_city(slug.as_str()))?;

    let days = state.load_forecast(city).await?;
    let suggestions = suggestions::suggest_days(city, &days);

    Ok(Json(ApiForecast {
        city: ApiCity::from(city),
        days: days
            .iter()
            .zip(suggestions)
            .map(|(day, suggestion)| ApiForecastDay::new(day, suggestion))
            .collect(),
    }))
}
