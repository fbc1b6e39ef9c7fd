//! `OpenMeteo` API response structures and conversion utilities

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{City, DailyForecast, WeatherCode};
use crate::{Result, WeatherWiseError};

/// Number of days requested from the forecast endpoint
pub const FORECAST_DAYS: usize = 7;

/// Daily variables requested, in the order Open-Meteo echoes them back
pub const DAILY_FIELDS: [&str; 7] = [
    "temperature_2m_max",
    "temperature_2m_min",
    "rain_sum",
    "wind_speed_10m_max",
    "weather_code",
    "precipitation_probability_max",
    "cloud_cover_mean",
];

/// Forecast request URL for a city. Also serves as the cache key.
#[must_use]
pub fn forecast_url(base_url: &str, city: &City) -> String {
    format!(
        "{}/forecast?latitude={}&longitude={}&daily={}&timezone=auto&temperature_unit=fahrenheit&precipitation_unit=inch&wind_speed_unit=mph&forecast_days={}",
        base_url.trim_end_matches('/'),
        city.latitude,
        city.longitude,
        DAILY_FIELDS.join(","),
        FORECAST_DAYS
    )
}

/// Forecast response from `OpenMeteo` API
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub daily: Option<DailyData>,
}

/// Daily weather data from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct DailyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Vec<Option<f32>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Vec<Option<f32>>,
    #[serde(rename = "rain_sum")]
    pub rain: Option<Vec<Option<f32>>>,
    #[serde(rename = "wind_speed_10m_max")]
    pub wind_speed_max: Option<Vec<Option<f32>>>,
    pub weather_code: Option<Vec<Option<f32>>>,
    pub precipitation_probability_max: Option<Vec<Option<f32>>>,
    pub cloud_cover_mean: Option<Vec<Option<f32>>>,
}

/// Error body returned with 4xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub reason: String,
}

fn check_len<T>(name: &str, values: Option<&Vec<T>>, expected: usize) -> Result<()> {
    match values {
        Some(values) if values.len() != expected => {
            Err(WeatherWiseError::invalid_forecast(format!(
                "Misaligned daily field '{name}': {} values for {expected} days",
                values.len()
            )))
        }
        _ => Ok(()),
    }
}

fn value_at(values: Option<&Vec<Option<f32>>>, i: usize) -> Option<f32> {
    values.and_then(|v| v.get(i).copied().flatten())
}

fn percent(value: Option<f32>) -> Option<u8> {
    // Clamped to 0..=100 before the cast
    value.map(|v| v.round().clamp(0.0, 100.0) as u8)
}

impl DailyData {
    fn validate(&self) -> Result<()> {
        let days = self.time.len();
        check_len("temperature_2m_max", Some(&self.temperature_max), days)?;
        check_len("temperature_2m_min", Some(&self.temperature_min), days)?;
        check_len("rain_sum", self.rain.as_ref(), days)?;
        check_len("wind_speed_10m_max", self.wind_speed_max.as_ref(), days)?;
        check_len("weather_code", self.weather_code.as_ref(), days)?;
        check_len(
            "precipitation_probability_max",
            self.precipitation_probability_max.as_ref(),
            days,
        )?;
        check_len("cloud_cover_mean", self.cloud_cover_mean.as_ref(), days)?;
        Ok(())
    }
}

impl ForecastResponse {
    /// Convert the parallel daily arrays into one record per day
    pub fn into_daily_forecasts(self) -> Result<Vec<DailyForecast>> {
        let daily = self
            .daily
            .ok_or_else(|| WeatherWiseError::invalid_forecast("Response has no daily block"))?;
        daily.validate()?;

        let mut forecasts = Vec::with_capacity(daily.time.len());
        for (i, day) in daily.time.iter().enumerate() {
            let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map_err(|e| {
                    WeatherWiseError::invalid_forecast(format!("Invalid date '{day}': {e}"))
                })?;

            let (Some(max_temp_f), Some(min_temp_f)) =
                (daily.temperature_max[i], daily.temperature_min[i])
            else {
                return Err(WeatherWiseError::invalid_forecast(format!(
                    "Missing temperature for {day}"
                )));
            };

            let weather_code = value_at(daily.weather_code.as_ref(), i)
                .filter(|code| (0.0..255.0).contains(code))
                .map_or(WeatherCode::UNKNOWN, |code| WeatherCode(code as u8));

            forecasts.push(DailyForecast {
                date,
                max_temp_f,
                min_temp_f,
                rain_in: value_at(daily.rain.as_ref(), i).unwrap_or(0.0),
                wind_mph: value_at(daily.wind_speed_max.as_ref(), i).unwrap_or(0.0),
                weather_code,
                precipitation_probability: percent(value_at(
                    daily.precipitation_probability_max.as_ref(),
                    i,
                )),
                cloud_cover: percent(value_at(daily.cloud_cover_mean.as_ref(), i)),
            });
        }

        Ok(forecasts)
    }
}

/// Decode a raw response body and transform it into daily records
pub fn parse_daily_forecasts(body: &str) -> Result<Vec<DailyForecast>> {
    let response: ForecastResponse = serde_json::from_str(body)
        .map_err(|e| {
            WeatherWiseError::invalid_forecast(format!("Failed to parse OpenMeteo response: {e}"))
        })?;
    response.into_daily_forecasts()
}
