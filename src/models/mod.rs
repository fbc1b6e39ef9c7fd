//! Data models for the WeatherWise dashboard
//!
//! This module contains the core domain models organized by concern:
//! - City: The fixed set of supported cities and their coordinates
//! - Forecast: One day of forecast values and its display helpers

pub mod city;
pub mod forecast;

// Re-export all public types for convenient access
pub use city::{CITIES, City};
pub use forecast::{DailyForecast, WeatherCode};
