use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use forecast_core::{
    Config, ForecastRequest, ForecastSession, ProviderId, TimeBasis,
    provider::default_provider_from_config,
};
use inquire::{Confirm, Password, PasswordDisplayMode, Text};

use crate::dashboard::Dashboard;

const DEFAULT_FORECAST_DAYS: usize = 7;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Multi-day weather forecast in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather".
        provider: String,
    },

    /// Show current conditions and the day-by-day forecast for a place.
    Show {
        /// Place name, e.g. "Oakland,CA,USA". Falls back to `default_place`.
        place: Option<String>,

        /// Number of 3-hour samples to request (1-40).
        #[arg(long)]
        count: Option<u32>,

        /// Number of days in the forecast list.
        #[arg(long, default_value_t = DEFAULT_FORECAST_DAYS)]
        days: usize,

        /// Use UTC instead of the city's own clock for dates and day/night icons.
        #[arg(long)]
        utc: bool,

        /// Print the normalized forecast as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the location of the configuration file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { place, count, days, utc, json } => {
                show(place, count, days, utc, json).await
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    let had_other_default = config
        .default_provider_id()
        .map(|current| current != id)
        .unwrap_or(false);
    config.upsert_provider_api_key(id, api_key);

    if had_other_default
        && Confirm::new(&format!("Make {id} the default provider?"))
            .with_default(true)
            .prompt()?
    {
        config.set_default_provider(id);
    }

    let mut place_prompt = Text::new("Default place (leave empty to skip):");
    if let Some(current) = config.default_place.as_deref() {
        place_prompt = place_prompt.with_default(current);
    }
    let place = place_prompt.prompt()?;
    let place = place.trim();
    config.default_place = (!place.is_empty()).then(|| place.to_string());

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    place: Option<String>,
    count: Option<u32>,
    days: usize,
    utc: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;

    let place = place.or_else(|| config.default_place.clone()).ok_or_else(|| {
        anyhow!(
            "No place given and no default place configured.\n\
             Hint: run `forecast show <place>` or set `default_place` via `forecast configure`."
        )
    })?;
    let basis = if utc { TimeBasis::Utc } else { config.time_basis };
    let count = count.unwrap_or_else(|| config.sample_count());

    let provider = default_provider_from_config(&config)?;

    let mut session = ForecastSession::new();
    let ticket = session.select(place);
    tracing::debug!(place = ticket.place(), count, ?basis, days, "showing forecast");
    eprintln!("Loading forecast for {}...", ticket.place());

    let result = provider
        .fetch_forecast(&ForecastRequest::new(ticket.place(), count))
        .await;
    session.complete(&ticket, result);

    if let Some(err) = session.last_error() {
        return Err(anyhow!("{err}"));
    }
    let response = session
        .current()
        .ok_or_else(|| anyhow!("No forecast available for {}", ticket.place()))?;

    let dashboard = Dashboard::build(response, basis, days);
    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print!("{dashboard}");
    }

    Ok(())
}
