//! Daily forecast model and display methods

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// WMO weather interpretation code as reported by Open-Meteo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherCode(pub u8);

impl WeatherCode {
    /// Placeholder for days the API reported without a code
    pub const UNKNOWN: WeatherCode = WeatherCode(u8::MAX);

    /// Short, emoji-prefixed description used in cards and tables
    #[must_use]
    pub fn description(self) -> &'static str {
        match self.0 {
            0 => "☀️ Sunny",
            1 => "🌤️ Mostly Clear",
            2 => "⛅ Partly Cloudy",
            3 => "☁️ Cloudy",
            45 | 48 => "🌫️ Fog",
            51..=67 => "🌦️ Rain/Drizzle",
            71..=77 => "❄️ Snow",
            80..=82 => "🌧️ Showers",
            95..=99 => "⛈️ Thunderstorm",
            _ => "🌈",
        }
    }
}

/// One calendar day of forecast values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Local calendar date at the city
    pub date: NaiveDate,
    /// Maximum temperature in °F
    pub max_temp_f: f32,
    /// Minimum temperature in °F
    pub min_temp_f: f32,
    /// Rain sum in inches
    pub rain_in: f32,
    /// Maximum wind speed in mph
    pub wind_mph: f32,
    pub weather_code: WeatherCode,
    /// Maximum precipitation probability in percent, when reported
    pub precipitation_probability: Option<u8>,
    /// Mean cloud cover in percent, when reported
    pub cloud_cover: Option<u8>,
}

/// English ordinal suffix for a day of the month
#[must_use]
pub fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

impl DailyForecast {
    /// Long label, e.g. `Monday, January 1st`
    #[must_use]
    pub fn date_label(&self) -> String {
        let day = self.date.day();
        format!("{}{}{}", self.date.format("%A, %B "), day, ordinal_suffix(day))
    }

    /// Compact label for chart axes, e.g. `Mon 1`
    #[must_use]
    pub fn short_label(&self) -> String {
        format!("{} {}", self.date.format("%a"), self.date.day())
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        self.weather_code.description()
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_max_temp(&self) -> String {
        format!("{:.0}°F", self.max_temp_f)
    }

    #[must_use]
    pub fn format_min_temp(&self) -> String {
        format!("{:.0}°F", self.min_temp_f)
    }

    #[must_use]
    pub fn format_rain(&self) -> String {
        format!("{:.2} in", self.rain_in)
    }

    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{:.0} mph", self.wind_mph)
    }
}
