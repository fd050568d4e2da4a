use async_trait::async_trait;
use chrono::{NaiveDateTime, Timelike};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::ProviderError;
use crate::model::{CurrentConditions, ForecastDay, Location};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Client for the OpenWeather geocoding, current-weather and 5-day
/// forecast endpoints. All data is requested metric; units are applied at
/// render time.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        })
    }

    /// Point the client at a different host. Tests use this to talk to a
    /// local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ProviderError> {
        let res = self.http.get(url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn geocode(&self, city: &str) -> Result<Option<Location>, ProviderError> {
        let url = format!("{}/geo/1.0/direct", self.base_url);
        let body = self
            .get(
                &url,
                &[("q", city), ("limit", "1"), ("appid", self.api_key.as_str())],
            )
            .await?;

        let matches: Vec<GeoMatch> = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Payload(format!("geocoding response: {e}")))?;

        debug!("geocoding {city:?} returned {} match(es)", matches.len());

        Ok(matches.first().map(|m| Location {
            latitude: m.lat,
            longitude: m.lon,
        }))
    }

    async fn current_conditions(
        &self,
        location: Location,
    ) -> Result<CurrentConditions, ProviderError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let lat = location.latitude.to_string();
        let lon = location.longitude.to_string();
        let body = self
            .get(
                &url,
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("appid", self.api_key.as_str()),
                    ("units", "metric"),
                ],
            )
            .await?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Payload(format!("current conditions response: {e}")))?;

        let weather = parsed.weather.first().ok_or_else(|| {
            ProviderError::Payload("current conditions response: empty weather array".to_string())
        })?;

        Ok(CurrentConditions {
            place_name: parsed.name,
            temperature_c: parsed.main.temp,
            temp_min_c: parsed.main.temp_min,
            temp_max_c: parsed.main.temp_max,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            wind_direction_deg: parsed.wind.deg,
            description: weather.description.clone(),
            icon_id: weather.icon.clone(),
        })
    }

    async fn forecast(&self, location: Location) -> Result<Vec<ForecastDay>, ProviderError> {
        let url = format!("{}/data/2.5/forecast", self.base_url);
        let lat = location.latitude.to_string();
        let lon = location.longitude.to_string();
        let body = self
            .get(
                &url,
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("appid", self.api_key.as_str()),
                    ("units", "metric"),
                ],
            )
            .await?;

        let parsed: OwForecastResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Payload(format!("forecast response: {e}")))?;

        let days = noon_entries(parsed.list)?;
        debug!(
            "forecast for ({}, {}) kept {} noon entries",
            location.latitude,
            location.longitude,
            days.len()
        );

        Ok(days)
    }
}

/// Downsample the 3-hourly forecast list to the noon reading of each day.
/// Days without a 12:00:00 entry are absent from the result; source order
/// is preserved, never re-sorted.
fn noon_entries(list: Vec<OwForecastEntry>) -> Result<Vec<ForecastDay>, ProviderError> {
    let mut days = Vec::new();

    for entry in list {
        let stamp = NaiveDateTime::parse_from_str(&entry.dt_txt, TIMESTAMP_FORMAT).map_err(
            |e| ProviderError::Payload(format!("forecast timestamp {:?}: {e}", entry.dt_txt)),
        )?;

        if (stamp.hour(), stamp.minute(), stamp.second()) != (12, 0, 0) {
            continue;
        }

        let weather = entry.weather.first().ok_or_else(|| {
            ProviderError::Payload(format!("forecast entry {}: empty weather array", entry.dt_txt))
        })?;

        days.push(ForecastDay {
            date: stamp.date(),
            temperature_c: entry.main.temp,
            description: weather.description.clone(),
            icon_id: weather.icon.clone(),
        });
    }

    Ok(days)
}

#[derive(Debug, Deserialize)]
struct GeoMatch {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: u16,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dt_txt: &str, temp: f64) -> OwForecastEntry {
        OwForecastEntry {
            dt_txt: dt_txt.to_string(),
            main: OwMain {
                temp,
                temp_min: temp,
                temp_max: temp,
                humidity: 50,
            },
            weather: vec![OwWeather {
                description: "clear sky".to_string(),
                icon: "01d".to_string(),
            }],
        }
    }

    #[test]
    fn noon_entries_keeps_one_reading_per_day() {
        let mut list = Vec::new();
        for day in 1..=5 {
            for hour in (0..24).step_by(3) {
                let temp = if hour == 12 { 20.0 + day as f64 } else { 10.0 };
                list.push(entry(&format!("2024-05-{day:02} {hour:02}:00:00"), temp));
            }
        }

        let days = noon_entries(list).expect("filtering should succeed");

        assert_eq!(days.len(), 5);
        for (i, day) in days.iter().enumerate() {
            assert_eq!(day.date.to_string(), format!("2024-05-{:02}", i + 1));
            assert_eq!(day.temperature_c, 20.0 + (i + 1) as f64);
            assert_eq!(day.description, "clear sky");
            assert_eq!(day.icon_id, "01d");
        }
    }

    #[test]
    fn days_without_noon_reading_are_omitted() {
        let list = vec![
            entry("2024-05-01 09:00:00", 9.0),
            entry("2024-05-01 12:00:00", 12.0),
            // final day cut off before noon
            entry("2024-05-02 00:00:00", 7.0),
            entry("2024-05-02 09:00:00", 9.0),
        ];

        let days = noon_entries(list).expect("filtering should succeed");

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date.to_string(), "2024-05-01");
        assert_eq!(days[0].temperature_c, 12.0);
    }

    #[test]
    fn malformed_timestamp_is_a_payload_error() {
        let list = vec![entry("yesterday-ish", 10.0)];

        let err = noon_entries(list).unwrap_err();
        assert!(matches!(err, ProviderError::Payload(_)));
    }

    #[test]
    fn empty_list_yields_empty_forecast() {
        let days = noon_entries(Vec::new()).expect("filtering should succeed");
        assert!(days.is_empty());
    }
}
