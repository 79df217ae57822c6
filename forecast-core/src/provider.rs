use crate::{Config, ForecastError, ForecastQuery, WeatherSnapshot, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch a one-day hourly forecast for `query`.
    async fn fetch_forecast(&self, query: &ForecastQuery) -> Result<WeatherSnapshot, ForecastError>;
}

/// Construct the weather client from config. Fails with `MissingCredential`
/// without touching the network when no API key is configured.
pub fn provider_from_config(config: &Config) -> Result<WeatherApiProvider, ForecastError> {
    let api_key = config.api_key()?;
    Ok(WeatherApiProvider::with_base_url(api_key.to_owned(), config.weather_base_url.clone()))
}
