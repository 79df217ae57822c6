//! Error taxonomy shared by the clients, the presenter and the orchestrator.

use thiserror::Error;

/// Every failure is terminal for the run; nothing here is retried.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("WEATHER_API_KEY is not set")]
    MissingCredential,

    #[error("Could not determine current location: {0}")]
    LocationUnavailable(String),

    #[error("Weather API unavailable{}: {message}", status_suffix(.status))]
    UpstreamUnavailable { status: Option<u16>, message: String },

    #[error("Malformed weather API response: {0}")]
    MalformedResponse(String),

    #[error("Failed to write forecast: {0}")]
    Output(#[from] std::io::Error),
}

impl ForecastError {
    /// Text shown to the user when the run ends with this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredential => "WEATHER_API_KEY is not set in environment variables.\n\
                 Hint: get a key at https://www.weatherapi.com and export WEATHER_API_KEY."
                .to_string(),
            Self::LocationUnavailable(msg) => format!("Failed to get location: {msg}"),
            Self::UpstreamUnavailable { status: Some(code), .. } => {
                format!("API unavailable: status code {code}")
            }
            Self::UpstreamUnavailable { status: None, message } => {
                format!("Error making the request to the API: {message}")
            }
            Self::MalformedResponse(msg) => format!("Error parsing the API response: {msg}"),
            Self::Output(err) => format!("Error writing output: {err}"),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" (status {code})")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_message_has_hint() {
        let msg = ForecastError::MissingCredential.user_message();
        assert!(msg.contains("WEATHER_API_KEY"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn upstream_message_includes_status_when_known() {
        let err = ForecastError::UpstreamUnavailable { status: Some(403), message: "denied".into() };
        assert!(err.user_message().contains("403"));
        assert!(err.to_string().contains("(status 403)"));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn upstream_message_without_status_mentions_request() {
        let err = ForecastError::UpstreamUnavailable { status: None, message: "timed out".into() };
        assert!(err.user_message().contains("timed out"));
        assert!(!err.to_string().contains("status"));
    }
}
