use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ForecastError,
    model::{ForecastQuery, HourlyForecast, WeatherSnapshot},
};

use super::WeatherProvider;

#[derive(Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl fmt::Debug for WeatherApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl WeatherApiProvider {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    async fn fetch(&self, query: &ForecastQuery) -> Result<WeatherSnapshot, ForecastError> {
        let url = format!("{}/forecast.json", self.base_url);
        let q = query.to_query_param();

        debug!(%url, q = %q, "requesting one-day forecast");

        // Fixed request shape: one day, no air quality, no alerts.
        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", q.as_str()),
                ("days", "1"),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .send()
            .await
            .map_err(|err| {
                // The request URL carries the API key.
                let err = err.without_url();
                warn!(error = %err, "WeatherAPI request failed");
                ForecastError::UpstreamUnavailable {
                    status: None,
                    message: format!("Failed to send request to WeatherAPI.com: {err}"),
                }
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|err| ForecastError::UpstreamUnavailable {
            status: Some(status.as_u16()),
            message: format!("Failed to read WeatherAPI response body: {}", err.without_url()),
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "WeatherAPI returned non-success status");
            return Err(ForecastError::UpstreamUnavailable {
                status: Some(status.as_u16()),
                message: truncate_body(&body),
            });
        }

        let snapshot = decode_forecast(&body)?;
        info!(
            location = %snapshot.location_name,
            hours = snapshot.hours.len(),
            "decoded WeatherAPI forecast"
        );

        Ok(snapshot)
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastHour {
    time_epoch: i64,
    temp_c: f64,
    condition: WaCondition,
    chance_of_rain: f64,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    hour: Vec<WaForecastHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    current: WaCurrent,
    forecast: WaForecast,
}

/// Decode a `forecast.json` body. Any structural mismatch, including an
/// empty `forecastday` list, is a single `MalformedResponse`.
pub fn decode_forecast(body: &str) -> Result<WeatherSnapshot, ForecastError> {
    let parsed: WaForecastResponse = serde_json::from_str(body)
        .map_err(|err| ForecastError::MalformedResponse(format!("Failed to parse WeatherAPI JSON: {err}")))?;

    let day = parsed.forecast.forecastday.into_iter().next().ok_or_else(|| {
        ForecastError::MalformedResponse("WeatherAPI response contained no forecastday data".to_string())
    })?;

    let hours = day
        .hour
        .into_iter()
        .map(|h| {
            let time = unix_to_utc(h.time_epoch).ok_or_else(|| {
                ForecastError::MalformedResponse(format!("time_epoch {} is out of range", h.time_epoch))
            })?;

            Ok(HourlyForecast {
                time,
                temperature_c: h.temp_c,
                condition: h.condition.text,
                chance_of_rain: h.chance_of_rain,
            })
        })
        .collect::<Result<Vec<_>, ForecastError>>()?;

    Ok(WeatherSnapshot {
        location_name: parsed.location.name,
        country: parsed.location.country,
        temperature_c: parsed.current.temp_c,
        condition: parsed.current.condition.text,
        hours,
    })
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    #[instrument(skip(self, query), fields(query = %query))]
    async fn fetch_forecast(&self, query: &ForecastQuery) -> Result<WeatherSnapshot, ForecastError> {
        self.fetch(query).await
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
