use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::model::{WeatherQuery, WeatherReading};

use super::{FetchError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at another host, e.g. a proxy or a mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn query_params(&self, query: &WeatherQuery) -> Vec<(&'static str, String)> {
        let mut params = match query {
            WeatherQuery::City(name) => vec![("q", name.clone())],
            WeatherQuery::Coordinates {
                latitude,
                longitude,
            } => vec![
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ],
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));
        params
    }

    async fn fetch_current(&self, query: &WeatherQuery) -> Result<WeatherReading, FetchError> {
        let url = format!("{}/weather", self.base_url);

        tracing::debug!(%query, "requesting current weather from OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&self.query_params(query))
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        // Error bodies are JSON too; anything else (a gateway page) is a parse failure.
        if !status.is_success() {
            tracing::warn!(
                %query,
                %status,
                body = %truncate_body(&body),
                "OpenWeather request failed"
            );
            let envelope: OwEnvelope = serde_json::from_str(&body)?;
            return Err(FetchError::Api {
                status,
                message: envelope.into_message(),
            });
        }

        let envelope: OwEnvelope = serde_json::from_str(&body)?;
        if !envelope.is_ok() {
            tracing::warn!(
                %query,
                body = %truncate_body(&body),
                "OpenWeather reported an error code"
            );
            return Err(FetchError::Api {
                status,
                message: envelope.into_message(),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        Ok(parsed.into_reading())
    }
}

#[derive(Debug, Deserialize)]
struct OwEnvelope {
    cod: Option<serde_json::Value>,
    message: Option<serde_json::Value>,
}

impl OwEnvelope {
    /// Only the numeric 200 counts; error payloads send `cod` as a string.
    fn is_ok(&self) -> bool {
        self.cod.as_ref().and_then(serde_json::Value::as_i64) == Some(200)
    }

    fn into_message(self) -> Option<String> {
        match self.message? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl OwCurrentResponse {
    fn into_reading(self) -> WeatherReading {
        let observed_at =
            DateTime::<Utc>::from_timestamp(self.dt, 0).unwrap_or_else(Utc::now);

        let (condition, description) = self
            .weather
            .into_iter()
            .next()
            .map(|w| (w.main, w.description))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

        WeatherReading {
            location_name: self.name,
            condition,
            description,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            pressure_hpa: self.main.pressure,
            wind_speed_mps: self.wind.speed,
            wind_direction_deg: self.wind.deg,
            observed_at,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherReading, FetchError> {
        if !query.has_valid_coordinates() {
            return Err(FetchError::InvalidCoordinates);
        }
        self.fetch_current(query).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
