//! Turns a `WeatherSnapshot` into terminal output.
//!
//! Two renderers share the same rules:
//! - only hours strictly after "now" are shown, with "now" read from the
//!   clock for every entry as it is rendered;
//! - an hour is high rain risk when its chance of rain is above 40%.

use chrono::TimeZone;
use comfy_table::{Cell, Color, Table, presets::ASCII_FULL_CONDENSED};
use crossterm::style::Stylize;
use std::{fmt::Display, io::Write};

use crate::{
    clock::Clock,
    error::ForecastError,
    model::{HourlyForecast, WeatherSnapshot},
};

/// Chance of rain (percent) above which an hour is high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 40.0;

pub const TABLE_HINT: &str = "Tip: Red rows indicate a high chance of rain. Be prepared!";

const TABLE_HEADER: [&str; 4] = ["Time", "Temp (°C)", "Chance of Rain (%)", "Condition"];

/// Appended to the rain cell of high-risk rows when color is off.
const PLAIN_MARKER: &str = "!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainRisk {
    Normal,
    High,
}

impl RainRisk {
    pub fn classify(chance_of_rain: f64) -> Self {
        if chance_of_rain > HIGH_RISK_THRESHOLD { RainRisk::High } else { RainRisk::Normal }
    }

    pub fn is_high(self) -> bool {
        self == RainRisk::High
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Lines,
}

/// Renders forecasts in a fixed time zone, using `clock` as "now".
#[derive(Debug, Clone)]
pub struct Presenter<C, Tz> {
    clock: C,
    tz: Tz,
    format: OutputFormat,
    color: bool,
}

struct HourRow {
    time: String,
    temperature: String,
    chance_of_rain: String,
    condition: String,
    risk: RainRisk,
}

impl<C, Tz> Presenter<C, Tz>
where
    C: Clock,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn new(clock: C, tz: Tz) -> Self {
        Self { clock, tz, format: OutputFormat::default(), color: true }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn render<W: Write>(&self, snapshot: &WeatherSnapshot, out: &mut W) -> Result<(), ForecastError> {
        match self.format {
            OutputFormat::Lines => self.render_lines(snapshot, out)?,
            OutputFormat::Table => self.render_table(snapshot, out)?,
        }
        out.flush()?;
        Ok(())
    }

    /// Render into a `String` instead of a writer.
    pub fn render_to_string(&self, snapshot: &WeatherSnapshot) -> Result<String, ForecastError> {
        let mut buf = Vec::new();
        self.render(snapshot, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn is_upcoming(&self, hour: &HourlyForecast) -> bool {
        hour.time > self.clock.now()
    }

    fn rows(&self, snapshot: &WeatherSnapshot, temp_precision: usize) -> Vec<HourRow> {
        snapshot
            .hours
            .iter()
            .filter(|hour| self.is_upcoming(hour))
            .map(|hour| HourRow {
                time: hour.time.with_timezone(&self.tz).format("%H:%M").to_string(),
                temperature: format!("{:.*}", temp_precision, hour.temperature_c),
                // Shortest exact form, so 40.4 never prints as "40".
                chance_of_rain: hour.chance_of_rain.to_string(),
                condition: hour.condition.clone(),
                risk: RainRisk::classify(hour.chance_of_rain),
            })
            .collect()
    }

    fn render_lines<W: Write>(&self, snapshot: &WeatherSnapshot, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            "{}, {}: {:.0}°C, {}",
            snapshot.location_name, snapshot.country, snapshot.temperature_c, snapshot.condition
        )?;

        for row in self.rows(snapshot, 0) {
            let line = format!(
                "{}, {}°C, {}%, {}",
                row.time, row.temperature, row.chance_of_rain, row.condition
            );

            match (row.risk, self.color) {
                (RainRisk::High, true) => writeln!(out, "{}", line.red())?,
                (RainRisk::High, false) => writeln!(out, "{PLAIN_MARKER} {line}")?,
                (RainRisk::Normal, _) => writeln!(out, "{line}")?,
            }
        }

        Ok(())
    }

    fn render_table<W: Write>(&self, snapshot: &WeatherSnapshot, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            "\nWeather for {}, {}: {:.1}°C, {}\n",
            snapshot.location_name, snapshot.country, snapshot.temperature_c, snapshot.condition
        )?;

        let mut table = Table::new();
        table.load_preset(ASCII_FULL_CONDENSED).set_header(TABLE_HEADER);
        if self.color {
            table.enforce_styling();
        }

        for row in self.rows(snapshot, 1) {
            // Only the rain cell is highlighted.
            let rain = match (row.risk, self.color) {
                (RainRisk::High, true) => Cell::new(row.chance_of_rain).fg(Color::Red),
                (RainRisk::High, false) => Cell::new(format!("{}{PLAIN_MARKER}", row.chance_of_rain)),
                (RainRisk::Normal, _) => Cell::new(row.chance_of_rain),
            };
            table.add_row(vec![Cell::new(row.time), Cell::new(row.temperature), rain, Cell::new(row.condition)]);
        }

        writeln!(out, "{table}")?;
        writeln!(out, "\n{TABLE_HINT}")?;

        Ok(())
    }
}
