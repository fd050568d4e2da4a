//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The sequential city -> current conditions -> forecast lookup pipeline
//! - Shared domain models and unit conversions
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod units;

pub use config::{API_KEY_ENV, Config};
pub use error::{ProviderError, WeatherError};
pub use model::{CurrentConditions, ForecastDay, Location, Query, WeatherReport};
pub use pipeline::{ForecastPipeline, ForecastSession, QueryState};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use units::{Units, convert_temperature, convert_wind_speed};
