use chrono::{DateTime, Utc};
use std::fmt;

/// Approximate position of the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// What to ask the weather service for.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastQuery {
    Coordinates { latitude: f64, longitude: f64 },
    City(String),
}

impl ForecastQuery {
    /// Value of the upstream `q` parameter.
    pub fn to_query_param(&self) -> String {
        match self {
            ForecastQuery::Coordinates { latitude, longitude } => format!("{latitude},{longitude}"),
            ForecastQuery::City(city) => city.clone(),
        }
    }
}

impl From<&Location> for ForecastQuery {
    fn from(location: &Location) -> Self {
        ForecastQuery::Coordinates { latitude: location.latitude, longitude: location.longitude }
    }
}

impl fmt::Display for ForecastQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_param())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyForecast {
    pub time: DateTime<Utc>,
    pub temperature_c: f64,
    pub condition: String,
    /// Percentage as reported upstream, 0–100.
    pub chance_of_rain: f64,
}

/// Decoded forecast for one query: current conditions plus the hours of
/// the first forecast day, in upstream order.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub country: String,
    pub temperature_c: f64,
    pub condition: String,
    pub hours: Vec<HourlyForecast>,
}
