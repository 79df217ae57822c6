//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - IP geolocation and the WeatherAPI.com forecast client
//! - Shared domain models (queries, snapshots, hourly entries)
//! - Rendering of the hourly forecast with rain-risk highlighting
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries.

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod presenter;
pub mod provider;

pub use app::App;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::ForecastError;
pub use geolocation::{IpGeolocator, LocationResolver};
pub use model::{ForecastQuery, HourlyForecast, Location, WeatherSnapshot};
pub use presenter::{OutputFormat, Presenter, RainRisk};
pub use provider::{WeatherProvider, provider_from_config, weatherapi::WeatherApiProvider};
