//! One interactive lookup: pick a search mode, read the location, resolve it,
//! fetch the weather and print it.
//!
//! The session moves through `AwaitingModeSelection` -> `AwaitingLocationInput`
//! and then ends, either with a printed report or with a printed error. An
//! unknown mode ends it immediately, before any request is made.

use anyhow::Result;
use std::{io::Write, process::ExitCode};
use weather_core::{Coordinates, Geocoder, LocationQuery, WeatherProvider};

use crate::{prompt::Prompt, render};

/// How the user wants to describe the location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Name, ZIP code or landmark, resolved through the geocoder.
    General,
    /// Latitude and longitude typed in directly.
    Gps,
}

impl TryFrom<&str> for SearchMode {
    type Error = anyhow::Error;

    /// Accepts the menu numbers as well as the mode names, in any case.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "1" | "general" => Ok(SearchMode::General),
            "2" | "gps" => Ok(SearchMode::Gps),
            _ => Err(anyhow::anyhow!("Invalid option. Please enter 1 or 2.")),
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The weather report was printed.
    Reported,
    /// A lookup failed and the error was printed.
    LookupFailed,
    /// The mode selection was not understood.
    InvalidMode,
}

impl Outcome {
    /// Lookup failures are reported on stdout and still count as a normal exit.
    pub fn is_failure(self) -> bool {
        matches!(self, Outcome::InvalidMode)
    }

    pub fn exit_code(self) -> ExitCode {
        if self.is_failure() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

#[derive(Debug)]
pub struct Session<'a> {
    geocoder: &'a dyn Geocoder,
    weather: &'a dyn WeatherProvider,
}

impl<'a> Session<'a> {
    pub fn new(geocoder: &'a dyn Geocoder, weather: &'a dyn WeatherProvider) -> Self {
        Self { geocoder, weather }
    }

    pub async fn run<P: Prompt, W: Write>(&self, prompt: &mut P, out: &mut W) -> Result<Outcome> {
        let mode = match select_mode(prompt, out)? {
            Some(mode) => mode,
            None => return Ok(Outcome::InvalidMode),
        };

        let query = read_location(mode, prompt)?;
        self.lookup(query, out).await
    }

    async fn lookup<W: Write>(&self, query: LocationQuery, out: &mut W) -> Result<Outcome> {
        let at: Coordinates = match query {
            LocationQuery::ByText(text) => match self.geocoder.locate(&text).await {
                Ok(at) => at,
                Err(e) => {
                    writeln!(out, "[ERROR] {e}")?;
                    return Ok(Outcome::LookupFailed);
                }
            },
            LocationQuery::ByCoordinates(at) => at,
        };

        match self.weather.current(&at).await {
            Ok(snapshot) => {
                render::write_report(out, &at, &snapshot)?;
                Ok(Outcome::Reported)
            }
            Err(e) => {
                writeln!(out, "[ERROR] {e}")?;
                Ok(Outcome::LookupFailed)
            }
        }
    }
}

/// Show the menu and read the mode. `None` means the answer was not understood
/// and the explanation has been printed.
fn select_mode<P: Prompt, W: Write>(prompt: &mut P, out: &mut W) -> Result<Option<SearchMode>> {
    writeln!(out, "Choose search method:")?;
    writeln!(out, "1 - General (name, ZIP code, landmark)")?;
    writeln!(out, "2 - GPS (coordinates)")?;
    out.flush()?;

    let answer = prompt.ask("Enter 1 or 2:")?;
    match SearchMode::try_from(answer.as_str()) {
        Ok(mode) => Ok(Some(mode)),
        Err(e) => {
            writeln!(out, "{e}")?;
            Ok(None)
        }
    }
}

/// Coordinates are forwarded exactly as typed.
fn read_location<P: Prompt>(mode: SearchMode, prompt: &mut P) -> Result<LocationQuery> {
    match mode {
        SearchMode::General => {
            let text = prompt.ask("Name | Zip Code | Landmark:")?;
            Ok(LocationQuery::ByText(text.trim().to_string()))
        }
        SearchMode::Gps => {
            let lat = prompt.ask("Enter latitude:")?;
            let lon = prompt.ask("Enter longitude:")?;
            Ok(LocationQuery::ByCoordinates(Coordinates::from_raw(lat, lon)))
        }
    }
}
