use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing::warn;

use skycast_core::{
    Config, ForecastPipeline, Query, Units, WeatherReport, convert_temperature,
    convert_wind_speed, provider_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "City weather and 5-day forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred units.
    Configure,

    /// Show current conditions and the 5-day forecast for a city.
    Show {
        /// City name, e.g. "London".
        city: String,

        /// Display units for this lookup, overriding the configured default.
        #[arg(long)]
        units: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, units } => show(city, units).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()?;
    let units = inquire::Select::new("Preferred units:", Units::all().to_vec()).prompt()?;

    config.api_key = Some(api_key);
    config.units = Some(units);
    config.save()?;

    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

async fn show(city: String, units: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let units = match units {
        Some(value) => Units::try_from(value.as_str())?,
        None => config.units(),
    };

    let provider = provider_from_config(&config)?;
    let pipeline = ForecastPipeline::new(Arc::new(provider));

    let query = Query { city, units };
    match pipeline.run_query(&query).await {
        Ok(report) => {
            print_report(&report, units);
            Ok(())
        }
        Err(err) => {
            warn!("lookup for {:?} failed: {err}", query.city);
            bail!(err.user_message())
        }
    }
}

fn print_report(report: &WeatherReport, units: Units) {
    let current = &report.conditions;

    println!("{}", current.place_name);
    println!(
        "  {}  {}",
        format_temperature(current.temperature_c, units),
        current.description
    );
    println!(
        "  min {} / max {}",
        format_temperature(current.temp_min_c, units),
        format_temperature(current.temp_max_c, units)
    );
    println!("  humidity {}%", current.humidity_pct);
    println!(
        "  wind {} from {}°",
        format_wind(current.wind_speed_mps, units),
        current.wind_direction_deg
    );

    if report.forecast.is_empty() {
        return;
    }

    println!();
    println!("Noon forecast:");
    for day in &report.forecast {
        println!(
            "  {}  {:>10}  {}",
            day.date,
            format_temperature(day.temperature_c, units),
            day.description
        );
    }
}

fn format_temperature(celsius: f64, units: Units) -> String {
    format!(
        "{:.1} {}",
        convert_temperature(celsius, units),
        units.temperature_suffix()
    )
}

fn format_wind(mps: f64, units: Units) -> String {
    format!(
        "{:.1} {}",
        convert_wind_speed(mps, units),
        units.wind_speed_suffix()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_converts_for_imperial() {
        assert_eq!(format_temperature(0.0, Units::Metric), "0.0 °C");
        assert_eq!(format_temperature(0.0, Units::Imperial), "32.0 °F");
        assert_eq!(format_wind(10.0, Units::Metric), "10.0 m/s");
        assert_eq!(format_wind(10.0, Units::Imperial), "22.4 mph");
    }
}
