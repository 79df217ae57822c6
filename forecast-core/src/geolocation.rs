//! IP-based geolocation via ip-api.com.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tracing::{debug, info, instrument, warn};

use crate::{config::DEFAULT_GEOLOCATION_BASE_URL, error::ForecastError, model::Location};

#[async_trait]
pub trait LocationResolver: Send + Sync + Debug {
    /// Resolve the caller's approximate position. A single failed attempt
    /// is final.
    async fn resolve_location(&self) -> Result<Location, ForecastError>;
}

#[derive(Debug, Clone)]
pub struct IpGeolocator {
    base_url: String,
    http: Client,
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IpGeolocator {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_GEOLOCATION_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { base_url, http: Client::new() }
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    /// ip-api reports lookup failures with HTTP 200 and `status: "fail"`.
    status: Option<String>,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    country: Option<String>,
}

/// Decode an ip-api.com JSON body into a `Location`.
pub fn decode_location(body: &str) -> Result<Location, ForecastError> {
    let parsed: IpApiResponse = serde_json::from_str(body).map_err(|err| {
        ForecastError::LocationUnavailable(format!("Error parsing the JSON response: {err}"))
    })?;

    if let Some(status) = parsed.status.as_deref().filter(|s| *s != "success") {
        let reason = parsed.message.as_deref().unwrap_or("no reason given");
        return Err(ForecastError::LocationUnavailable(format!(
            "lookup returned status '{status}': {reason}"
        )));
    }

    match (parsed.lat, parsed.lon) {
        (Some(latitude), Some(longitude)) => Ok(Location {
            latitude,
            longitude,
            city: parsed.city,
            country: parsed.country,
        }),
        _ => Err(ForecastError::LocationUnavailable(
            "response is missing lat/lon".to_string(),
        )),
    }
}

#[async_trait]
impl LocationResolver for IpGeolocator {
    #[instrument(skip(self))]
    async fn resolve_location(&self) -> Result<Location, ForecastError> {
        let url = format!("{}/json/", self.base_url);
        debug!(%url, "requesting IP geolocation");

        let res = self.http.get(&url).send().await.map_err(|err| {
            warn!(error = %err, "geolocation request failed");
            ForecastError::LocationUnavailable(format!("Error making request to location API: {err}"))
        })?;

        let status = res.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "geolocation returned non-success status");
            return Err(ForecastError::LocationUnavailable(format!("status code {}", status.as_u16())));
        }

        let body = res.text().await.map_err(|err| {
            ForecastError::LocationUnavailable(format!("Error reading the response body: {err}"))
        })?;

        let location = decode_location(&body)?;
        info!(
            city = location.city.as_deref().unwrap_or("?"),
            country = location.country.as_deref().unwrap_or("?"),
            "resolved location"
        );

        Ok(location)
    }
}
