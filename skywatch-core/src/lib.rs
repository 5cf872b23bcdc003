//! Core library for the `skywatch` terminal weather app.
//!
//! This crate defines:
//! - An in-memory credential store with a single session, plus form checks
//! - The OpenWeather client behind a provider trait
//! - Pure presentation logic (wind categories, compass points, activities)
//! - Configuration handling
//!
//! It is used by `skywatch-cli`, but nothing here depends on a terminal.

pub mod auth;
pub mod config;
pub mod model;
pub mod present;
pub mod provider;

pub use auth::{
    CredentialStore, Identity,
    form::{FormError, LoginForm, RegistrationForm},
};
pub use config::Config;
pub use model::{WeatherQuery, WeatherReading};
pub use present::{
    Activity, ActivityRecommendation, CompassPoint, Condition, WeatherReport, WindCategory,
    classify_wind_direction, classify_wind_speed, recommend_activities,
};
pub use provider::{FetchError, WeatherProvider, openweather::OpenWeatherProvider};
