use serde::{Deserialize, Serialize};

/// Meters per second to miles per hour.
const MPS_TO_MPH: f64 = 2.237;

/// Display unit system. Raw report values are always metric; rendering
/// converts on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial]
    }

    /// The other system, for toggle-style switches.
    pub fn toggled(&self) -> Units {
        match self {
            Units::Metric => Units::Imperial,
            Units::Imperial => Units::Metric,
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_speed_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// Celsius to the displayed scale. Identity for metric.
pub fn convert_temperature(celsius: f64, units: Units) -> f64 {
    match units {
        Units::Metric => celsius,
        Units::Imperial => celsius * 9.0 / 5.0 + 32.0,
    }
}

/// Meters per second to the displayed scale. Identity for metric.
pub fn convert_wind_speed(mps: f64, units: Units) -> f64 {
    match units {
        Units::Metric => mps,
        Units::Imperial => mps * MPS_TO_MPH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_as_str_roundtrip() {
        for units in Units::all() {
            let parsed = Units::try_from(units.as_str()).expect("roundtrip should succeed");
            assert_eq!(*units, parsed);
        }
    }

    #[test]
    fn unknown_units_error() {
        let err = Units::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn temperature_fixed_points() {
        assert_eq!(convert_temperature(0.0, Units::Imperial), 32.0);
        assert_eq!(convert_temperature(100.0, Units::Imperial), 212.0);
        assert_eq!(convert_temperature(-40.0, Units::Imperial), -40.0);
    }

    #[test]
    fn metric_is_passthrough() {
        for value in [-12.5, 0.0, 15.2, 37.0] {
            assert_eq!(convert_temperature(value, Units::Metric), value);
            assert_eq!(convert_wind_speed(value, Units::Metric), value);
        }
    }

    #[test]
    fn wind_speed_to_mph() {
        let mph = convert_wind_speed(10.0, Units::Imperial);
        assert!((mph - 22.37).abs() < 0.01);
    }

    #[test]
    fn toggle_flips_between_systems() {
        assert_eq!(Units::Metric.toggled(), Units::Imperial);
        assert_eq!(Units::Imperial.toggled().toggled(), Units::Imperial);
    }
}
