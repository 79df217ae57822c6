use chrono::Local;
use clap::{Parser, ValueEnum};
use forecast_core::{App, Config, IpGeolocator, OutputFormat, Presenter, SystemClock, provider_from_config};
use std::{
    ffi::OsString,
    io::{self, IsTerminal},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "forecast",
    version,
    about = "Hourly forecast with rain-risk highlighting",
    long_about = "Shows today's remaining hourly forecast from WeatherAPI.com.\n\
                  Without a CITY, the location is resolved from your public IP address.\n\
                  Requires WEATHER_API_KEY in the environment."
)]
pub struct Cli {
    /// City name; if absent, your location is looked up by IP.
    pub city: Option<String>,

    /// How to print the hourly forecast.
    #[arg(long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Disable ANSI colors; high-risk hours are marked with `!` instead.
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Bordered table with a trailing hint.
    Table,
    /// One line per hour.
    Lines,
}

impl From<Format> for OutputFormat {
    fn from(value: Format) -> Self {
        match value {
            Format::Table => OutputFormat::Table,
            Format::Lines => OutputFormat::Lines,
        }
    }
}

impl Cli {
    /// Whether to emit ANSI colors on a stream. When this is false the
    /// presenter marks high-risk hours with `!` instead.
    pub fn color_enabled(&self, stream_is_terminal: bool) -> bool {
        color_enabled(self.no_color, std::env::var_os("NO_COLOR"), stream_is_terminal)
    }

    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        // Build the weather client first so a missing key is reported
        // before any network call, geolocation included.
        let provider = provider_from_config(&config)?;
        let resolver = IpGeolocator::with_base_url(config.geolocation_base_url.clone());

        let presenter = Presenter::new(SystemClock, Local)
            .with_format(self.format.into())
            .with_color(self.color_enabled(io::stdout().is_terminal()));

        let app = App::new(resolver, provider, presenter);

        let mut stdout = io::stdout().lock();
        app.run(self.city.as_deref(), &mut stdout).await?;

        Ok(())
    }
}

/// A non-empty `NO_COLOR` disables color, see https://no-color.org.
fn color_enabled(no_color_flag: bool, no_color_env: Option<OsString>, stream_is_terminal: bool) -> bool {
    let env_disables = no_color_env.is_some_and(|value| !value.is_empty());
    !no_color_flag && !env_disables && stream_is_terminal
}
