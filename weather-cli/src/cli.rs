use anyhow::Context;
use clap::Parser;
use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};
use weather_core::{Config, geocoder_from_config, provider_from_config};

use crate::{
    prompt::{InquirePrompt, LinePrompt},
    session::Session,
};

/// Top-level CLI struct. Everything else is asked interactively.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Current weather for a place name, ZIP code, landmark or GPS coordinates"
)]
pub struct Cli {}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = Config::load().context("Failed to load configuration")?;
        tracing::debug!(
            geocoding_url = %config.geocoding.url,
            weather_url = %config.weather.url,
            "Configuration loaded"
        );
        let geocoder = geocoder_from_config(&config)?;
        let provider = provider_from_config(&config)?;

        let session = Session::new(geocoder.as_ref(), provider.as_ref());
        let mut stdout = io::stdout();

        let outcome = if io::stdin().is_terminal() {
            session.run(&mut InquirePrompt, &mut stdout).await?
        } else {
            let mut prompt = LinePrompt::new(io::stdin().lock(), io::stdout());
            session.run(&mut prompt, &mut stdout).await?
        };

        Ok(outcome.exit_code())
    }
}
