//! Pure derivations from a [`WeatherReading`] to what the weather card shows:
//! wind category, compass direction, icon and suggested activities.
//!
//! Every function here is total. Physically implausible inputs (negative
//! wind speed, NaN, extreme temperatures) go through the same comparisons as
//! ordinary ones.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::model::WeatherReading;

/// Coarse weather class used to pick an activity list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    /// Anything the API reports outside the three classes above.
    Other(String),
}

impl Condition {
    /// Case-insensitive parse of the provider's condition code.
    pub fn from_code(code: &str) -> Self {
        match code.to_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" => Self::Rain,
            _ => Self::Other(code.to_string()),
        }
    }

    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Clear => "sun",
            Self::Clouds => "cloud",
            Self::Rain => "cloud-rain",
            Self::Other(_) => "sun",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WindCategory {
    Calm,
    LightBreeze,
    Moderate,
    Strong,
    Storm,
}

impl WindCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Calm => "Calm",
            Self::LightBreeze => "Light Breeze",
            Self::Moderate => "Moderate",
            Self::Strong => "Strong",
            Self::Storm => "Storm",
        }
    }

    /// 0 for calm up to 4 for storm.
    pub fn severity_rank(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for WindCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Buckets are `[low, high)`; anything from 20 m/s up (or NaN) is a storm.
pub fn classify_wind_speed(speed_mps: f64) -> WindCategory {
    if speed_mps < 0.5 {
        WindCategory::Calm
    } else if speed_mps < 6.0 {
        WindCategory::LightBreeze
    } else if speed_mps < 12.0 {
        WindCategory::Moderate
    } else if speed_mps < 20.0 {
        WindCategory::Strong
    } else {
        WindCategory::Storm
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassPoint {
    const ALL: [CompassPoint; 8] = [
        CompassPoint::N,
        CompassPoint::NE,
        CompassPoint::E,
        CompassPoint::SE,
        CompassPoint::S,
        CompassPoint::SW,
        CompassPoint::W,
        CompassPoint::NW,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nearest of the eight compass points. Degrees are reduced modulo 360
/// first, so 360 and -360 both land on north. Non-finite input maps to north.
pub fn classify_wind_direction(degrees: f64) -> CompassPoint {
    let normalized = degrees.rem_euclid(360.0);
    if !normalized.is_finite() {
        return CompassPoint::N;
    }
    let index = (normalized / 45.0).round() as usize % 8;
    CompassPoint::ALL[index]
}

/// Rounds to the nearest integer with ties going up (2.5 -> 3, -2.5 -> -2).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub name: &'static str,
    pub suitable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityRecommendation {
    pub title: &'static str,
    pub activities: Vec<Activity>,
}

impl ActivityRecommendation {
    pub fn suitable(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter().filter(|a| a.suitable)
    }
}

fn activity(name: &'static str, suitable: bool) -> Activity {
    Activity { name, suitable }
}

fn clear_activities(t: f64) -> ActivityRecommendation {
    ActivityRecommendation {
        title: "Perfect for Outdoor Activities!",
        activities: vec![
            activity("Go for a picnic in the park", (20.0..=30.0).contains(&t)),
            activity("Beach day", t >= 25.0),
            activity("Outdoor sports", (15.0..=30.0).contains(&t)),
            activity("Garden maintenance", (15.0..=28.0).contains(&t)),
            activity("Cycling", (15.0..=30.0).contains(&t)),
        ],
    }
}

fn cloudy_activities(t: f64) -> ActivityRecommendation {
    ActivityRecommendation {
        title: "Great for Mild Activities!",
        activities: vec![
            activity("Photography session", true),
            activity("Light hiking", t >= 15.0),
            activity("Visit a café", true),
            activity("Shopping", true),
            activity("City walking tour", t >= 10.0),
        ],
    }
}

fn rainy_activities() -> ActivityRecommendation {
    ActivityRecommendation {
        title: "Indoor Fun Time!",
        activities: vec![
            activity("Visit a museum", true),
            activity("Watch a movie", true),
            activity("Indoor rock climbing", true),
            activity("Board games café", true),
            activity("Cooking class", true),
        ],
    }
}

/// Suggested activities for a condition, each marked suitable or not for
/// the given temperature. Unrecognized conditions get the clear-sky list.
pub fn recommend_activities(condition: &Condition, temperature_c: f64) -> ActivityRecommendation {
    match condition {
        Condition::Clear => clear_activities(temperature_c),
        Condition::Clouds => cloudy_activities(temperature_c),
        Condition::Rain => rainy_activities(),
        Condition::Other(_) => clear_activities(temperature_c),
    }
}

/// Everything the weather card displays, derived from one reading.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub location_name: String,
    pub condition: Condition,
    pub description: String,
    pub icon: &'static str,
    /// Rounded for display.
    pub temperature_c: f64,
    /// Rounded for display.
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    pub wind_category: WindCategory,
    pub wind_direction: CompassPoint,
    pub activities: ActivityRecommendation,
    pub observed_at: DateTime<Utc>,
}

impl WeatherReport {
    /// Activities are judged against the rounded temperature, the same
    /// number the card shows.
    pub fn from_reading(reading: &WeatherReading) -> Self {
        let condition = Condition::from_code(&reading.condition);
        let temperature_c = round_half_up(reading.temperature_c);
        let activities = recommend_activities(&condition, temperature_c);

        Self {
            location_name: reading.location_name.clone(),
            icon: condition.icon_name(),
            description: reading.description.clone(),
            temperature_c,
            feels_like_c: round_half_up(reading.feels_like_c),
            humidity_pct: reading.humidity_pct,
            pressure_hpa: reading.pressure_hpa,
            wind_speed_mps: reading.wind_speed_mps,
            wind_category: classify_wind_speed(reading.wind_speed_mps),
            wind_direction: classify_wind_direction(reading.wind_direction_deg),
            activities,
            observed_at: reading.observed_at,
            condition,
        }
    }
}
