use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::units::Units;

/// A single user-initiated lookup.
#[derive(Debug, Clone)]
pub struct Query {
    pub city: String,
    /// Display preference at submit time. Raw report values stay metric.
    pub units: Units,
}

impl Query {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            units: Units::default(),
        }
    }
}

/// Coordinates resolved from a city name. Discarded after the fetch
/// sequence completes, never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions at the queried place, metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub place_name: String,
    pub temperature_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub wind_direction_deg: u16,
    pub description: String,
    /// Opaque provider icon identifier, resolved to an image by the
    /// rendering layer.
    pub icon_id: String,
}

/// One noon-sampled forecast entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub temperature_c: f64,
    pub description: String,
    pub icon_id: String,
}

/// Everything one successful query produces. Replaced as a whole on the
/// next query, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub conditions: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
}
