//! One run of the tool: pick a query, fetch, render.

use chrono::TimeZone;
use std::{fmt::Display, io::Write};
use tracing::info;

use crate::{
    clock::Clock,
    error::ForecastError,
    geolocation::LocationResolver,
    model::{ForecastQuery, WeatherSnapshot},
    presenter::Presenter,
    provider::WeatherProvider,
};

pub struct App<L, P, C, Tz> {
    resolver: L,
    provider: P,
    presenter: Presenter<C, Tz>,
}

impl<L, P, C, Tz> App<L, P, C, Tz>
where
    L: LocationResolver,
    P: WeatherProvider,
    C: Clock,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn new(resolver: L, provider: P, presenter: Presenter<C, Tz>) -> Self {
        Self { resolver, provider, presenter }
    }

    /// Decide what to ask the weather service for. Only consults the
    /// geolocation service when no city was given.
    pub async fn query_for(&self, city: Option<&str>) -> Result<ForecastQuery, ForecastError> {
        match city.map(str::trim).filter(|c| !c.is_empty()) {
            Some(city) => Ok(ForecastQuery::City(city.to_string())),
            None => {
                let location = self.resolver.resolve_location().await?;
                Ok(ForecastQuery::from(&location))
            }
        }
    }

    pub async fn fetch(&self, city: Option<&str>) -> Result<WeatherSnapshot, ForecastError> {
        let query = self.query_for(city).await?;
        info!(%query, "fetching forecast");
        self.provider.fetch_forecast(&query).await
    }

    /// Fetch and render. Nothing is written to `out` unless the forecast
    /// was fetched and decoded.
    pub async fn run<W: Write>(&self, city: Option<&str>, out: &mut W) -> Result<(), ForecastError> {
        let snapshot = self.fetch(city).await?;
        self.presenter.render(&snapshot, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::FixedClock,
        model::{HourlyForecast, Location},
        presenter::OutputFormat,
    };
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-19T08:00:00Z").unwrap().with_timezone(&Utc)
    }

    #[derive(Debug, Default)]
    struct FakeResolver {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl LocationResolver for FakeResolver {
        async fn resolve_location(&self) -> Result<Location, ForecastError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ForecastError::LocationUnavailable("status code 503".into()));
            }
            Ok(Location {
                latitude: 58.52,
                longitude: 31.27,
                city: Some("Veliky Novgorod".into()),
                country: Some("Russia".into()),
            })
        }
    }

    #[derive(Debug, Default)]
    struct FakeProvider {
        queries: Mutex<Vec<ForecastQuery>>,
        forbidden: bool,
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch_forecast(&self, query: &ForecastQuery) -> Result<WeatherSnapshot, ForecastError> {
            self.queries.lock().unwrap().push(query.clone());
            if self.forbidden {
                return Err(ForecastError::UpstreamUnavailable { status: Some(403), message: String::new() });
            }
            Ok(WeatherSnapshot {
                location_name: "Novgorod".into(),
                country: "Russia".into(),
                temperature_c: 7.0,
                condition: "Overcast".into(),
                hours: vec![HourlyForecast {
                    time: now() + Duration::hours(1),
                    temperature_c: 8.0,
                    condition: "Light rain".into(),
                    chance_of_rain: 85.0,
                }],
            })
        }
    }

    fn app(resolver: FakeResolver, provider: FakeProvider) -> App<FakeResolver, FakeProvider, FixedClock, Utc> {
        let presenter = Presenter::new(FixedClock(now()), Utc)
            .with_format(OutputFormat::Lines)
            .with_color(false);
        App::new(resolver, provider, presenter)
    }

    #[tokio::test]
    async fn city_argument_skips_geolocation() {
        let app = app(FakeResolver::default(), FakeProvider::default());
        let mut out = Vec::new();

        app.run(Some("Novgorod"), &mut out).await.unwrap();

        assert_eq!(app.resolver.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            *app.provider.queries.lock().unwrap(),
            vec![ForecastQuery::City("Novgorod".into())]
        );
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("! 09:00, 8°C, 85%, Light rain"));
    }

    #[tokio::test]
    async fn no_city_uses_resolved_coordinates() {
        let app = app(FakeResolver::default(), FakeProvider::default());
        let mut out = Vec::new();

        app.run(None, &mut out).await.unwrap();

        assert_eq!(app.resolver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *app.provider.queries.lock().unwrap(),
            vec![ForecastQuery::Coordinates { latitude: 58.52, longitude: 31.27 }]
        );
    }

    #[tokio::test]
    async fn blank_city_falls_back_to_geolocation() {
        let app = app(FakeResolver::default(), FakeProvider::default());

        let query = app.query_for(Some("   ")).await.unwrap();

        assert_eq!(app.resolver.calls.load(Ordering::SeqCst), 1);
        assert!(matches!(query, ForecastQuery::Coordinates { .. }));
    }

    #[tokio::test]
    async fn geolocation_failure_stops_before_weather_call() {
        let resolver = FakeResolver { fail: true, ..Default::default() };
        let app = app(resolver, FakeProvider::default());
        let mut out = Vec::new();

        let err = app.run(None, &mut out).await.unwrap_err();

        assert!(matches!(err, ForecastError::LocationUnavailable(_)));
        assert!(app.provider.queries.lock().unwrap().is_empty());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_renders_nothing() {
        let provider = FakeProvider { forbidden: true, ..Default::default() };
        let app = app(FakeResolver::default(), provider);
        let mut out = Vec::new();

        let err = app.run(Some("Paris"), &mut out).await.unwrap_err();

        assert!(matches!(err, ForecastError::UpstreamUnavailable { status: Some(403), .. }));
        assert!(out.is_empty());
    }
}
