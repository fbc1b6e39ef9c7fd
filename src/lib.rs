//! `WeatherWise` - City weather dashboard
//!
//! This library provides the forecast client, the response cache, the
//! activity/food suggestion rules and the web layer serving the detail and
//! summary pages.

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod suggestions;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use cache::PersistentCache;
pub use config::WeatherWiseConfig;
pub use error::WeatherWiseError;
pub use models::{City, DailyForecast, WeatherCode};
pub use suggestions::{ActivityBucket, DaySuggestion, FoodBucket};
pub use weather::{ForecastProvider, WeatherClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherWiseError>;
