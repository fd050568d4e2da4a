use std::fmt::Debug;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::ProviderError;
use crate::model::{CurrentConditions, ForecastDay, Location};
use crate::provider::openweather::OpenWeatherProvider;

pub mod openweather;

/// Read-only weather data source behind the pipeline.
///
/// All values come back metric; display conversion happens at render time.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve a city name to coordinates, requesting at most one match.
    /// `None` means the provider knows no place by that name.
    async fn geocode(&self, city: &str) -> Result<Option<Location>, ProviderError>;

    /// Current conditions at a location.
    async fn current_conditions(
        &self,
        location: Location,
    ) -> Result<CurrentConditions, ProviderError>;

    /// Noon-sampled multi-day forecast, one entry per day, dates ascending.
    async fn forecast(&self, location: Location) -> Result<Vec<ForecastDay>, ProviderError>;
}

/// Construct the OpenWeather-backed provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key()?;
    let provider = OpenWeatherProvider::new(api_key, config.timeout())?;

    Ok(provider)
}
