use crate::error::ForecastError;

/// Environment variable holding the WeatherAPI.com key.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

pub const DEFAULT_WEATHER_BASE_URL: &str = "http://api.weatherapi.com/v1";
pub const DEFAULT_GEOLOCATION_BASE_URL: &str = "http://ip-api.com";

/// Runtime configuration. The only value read from the process
/// environment is the API key; endpoints default to the public services.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when the variable is missing or blank.
    pub api_key: Option<String>,

    pub weather_base_url: String,

    pub geolocation_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            geolocation_base_url: DEFAULT_GEOLOCATION_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Build config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Self { api_key, ..Self::default() }
    }

    /// Convenience helper for tests and embedders: set the key explicitly.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_weather_base_url(mut self, url: impl Into<String>) -> Self {
        self.weather_base_url = url.into();
        self
    }

    pub fn with_geolocation_base_url(mut self, url: impl Into<String>) -> Self {
        self.geolocation_base_url = url.into();
        self
    }

    /// Returns the API key, or `MissingCredential` when it was not provided.
    pub fn api_key(&self) -> Result<&str, ForecastError> {
        self.api_key.as_deref().ok_or(ForecastError::MissingCredential)
    }
}
