use thiserror::Error;

/// Errors surfaced by the lookup pipeline.
#[derive(Debug, Clone, Error)]
pub enum WeatherError {
    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// Geocoding knew no place by that name.
    #[error("city not found: {0}")]
    NotFound(String),

    /// One of the three provider calls misbehaved.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Failures talking to the weather provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed payload: {0}")]
    Payload(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Request(err.to_string())
        }
    }
}

impl WeatherError {
    /// Message safe to show to an end user. Provider diagnostics belong in
    /// the log, never in the rendered output.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::Validation(message) => message.clone(),
            WeatherError::NotFound(_) => "City not found.".to_string(),
            WeatherError::Provider(_) => "Failed to fetch weather data.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_wraps_into_weather_error() {
        let err: WeatherError = ProviderError::Timeout.into();
        assert!(matches!(err, WeatherError::Provider(ProviderError::Timeout)));
    }

    #[test]
    fn user_message_hides_provider_detail() {
        let err = WeatherError::Provider(ProviderError::Status {
            status: 500,
            body: "upstream stack trace".to_string(),
        });

        assert!(err.to_string().contains("500"));
        assert!(!err.user_message().contains("stack trace"));
        assert_eq!(err.user_message(), "Failed to fetch weather data.");
    }

    #[test]
    fn not_found_names_the_city() {
        let err = WeatherError::NotFound("Atlantis".to_string());
        assert!(err.to_string().contains("Atlantis"));
        assert_eq!(err.user_message(), "City not found.");
    }
}
