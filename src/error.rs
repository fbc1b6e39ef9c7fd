//! Failure modes of the dashboard and how they surface over HTTP

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherWiseError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Network failure, non-success status or exhausted retries
    #[error("Forecast service error: {message}")]
    Upstream { message: String },

    /// The response arrived but could not be turned into daily records
    #[error("Malformed forecast: {message}")]
    InvalidForecast { message: String },

    #[error("Unknown city: {key}")]
    UnknownCity { key: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WeatherWiseError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    pub fn invalid_forecast<S: Into<String>>(message: S) -> Self {
        Self::InvalidForecast {
            message: message.into(),
        }
    }

    pub fn unknown_city<S: Into<String>>(key: S) -> Self {
        Self::UnknownCity { key: key.into() }
    }

    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Text shown to visitors; internal details stay in the logs
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Upstream { .. } | Self::InvalidForecast { .. } => {
                "Unable to load the forecast right now. Please try again later.".to_string()
            }
            Self::UnknownCity { key } => format!("Unknown city: {key}"),
            Self::Config { .. } | Self::Cache { .. } | Self::Io { .. } => {
                "Something went wrong on our side.".to_string()
            }
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownCity { .. } => StatusCode::NOT_FOUND,
            Self::Upstream { .. } | Self::InvalidForecast { .. } => StatusCode::BAD_GATEWAY,
            Self::Config { .. } | Self::Cache { .. } | Self::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<reqwest_middleware::Error> for WeatherWiseError {
    fn from(err: reqwest_middleware::Error) -> Self {
        Self::upstream(format!("{err:#}"))
    }
}

impl From<reqwest::Error> for WeatherWiseError {
    fn from(err: reqwest::Error) -> Self {
        Self::upstream(err.to_string())
    }
}

impl IntoResponse for WeatherWiseError {
    fn into_response(self) -> Response {
        match &self {
            Self::UnknownCity { .. } => tracing::debug!("Rejected request: {self}"),
            _ => tracing::error!("Request failed: {self}"),
        }
        let body = Json(json!({ "error": self.user_message() }));
        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(WeatherWiseError::unknown_city("atlantis"), StatusCode::NOT_FOUND)]
    #[case(WeatherWiseError::upstream("503"), StatusCode::BAD_GATEWAY)]
    #[case(WeatherWiseError::invalid_forecast("no daily"), StatusCode::BAD_GATEWAY)]
    #[case(WeatherWiseError::cache("locked"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(WeatherWiseError::config("bad port"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_codes(#[case] err: WeatherWiseError, #[case] expected: StatusCode) {
        assert_eq!(err.status_code(), expected);
    }

    #[test]
    fn test_user_message_hides_details() {
        let err = WeatherWiseError::upstream("connection refused at 10.0.0.1");
        assert!(!err.user_message().contains("10.0.0.1"));
        assert!(err.to_string().contains("10.0.0.1"));

        let err = WeatherWiseError::unknown_city("atlantis");
        assert_eq!(err.user_message(), "Unknown city: atlantis");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WeatherWiseError = io_err.into();
        assert!(matches!(err, WeatherWiseError::Io { .. }));
    }
}
