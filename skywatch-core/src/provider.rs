use crate::{Config, WeatherQuery, WeatherReading, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

pub use reqwest::StatusCode;

/// Why a weather lookup produced no reading.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    #[error("Failed to reach the weather service: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered, but not with a usable reading.
    #[error(
        "Weather service returned {status}: {}",
        .message.as_deref().unwrap_or("no message")
    )]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Failed to parse weather response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// Message supplied by the service itself, if any.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            FetchError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// One request, one answer: no retries and no timeout beyond the
    /// transport's own.
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherReading, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `skywatch configure` and enter your API key."
        )
    })?;

    let provider =
        OpenWeatherProvider::with_base_url(api_key.to_owned(), config.base_url.clone());
    Ok(Box::new(provider))
}
