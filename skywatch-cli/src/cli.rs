use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use skywatch_core::{Config, provider::provider_from_config};

use crate::app::App;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skywatch", version, about = "Current weather with activity suggestions")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and the city shown after login.
    ///
    /// Prompts for both when neither flag is given, and for the key whenever
    /// none is passed or stored.
    Configure {
        #[arg(long)]
        api_key: Option<String>,

        #[arg(long)]
        default_city: Option<String>,
    },

    /// Start an interactive session (the default).
    Start {
        /// City to show right after login instead of the configured one.
        #[arg(long)]
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Start { city: None }) {
            Command::Configure {
                api_key,
                default_city,
            } => configure(api_key, default_city),
            Command::Start { city } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                let city = city
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| config.default_city.clone());

                App::new(provider, city).run().await
            }
        }
    }
}

/// Which values `configure` still has to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Prompts {
    api_key: bool,
    default_city: bool,
}

impl Prompts {
    /// With no flags at all both values are asked for, so a stored key can be
    /// replaced. Otherwise only a key that is neither passed nor stored is.
    fn needed(api_key_flag: bool, default_city_flag: bool, key_stored: bool) -> Self {
        let no_flags = !api_key_flag && !default_city_flag;
        Self {
            api_key: !api_key_flag && (no_flags || !key_stored),
            default_city: no_flags,
        }
    }
}

fn prompt_api_key() -> anyhow::Result<String> {
    Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")
}

fn prompt_default_city(current: &str) -> anyhow::Result<String> {
    Text::new("Default city:")
        .with_default(current)
        .prompt()
        .context("Failed to read default city")
}

fn configure(api_key: Option<String>, default_city: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let prompts = Prompts::needed(
        api_key.is_some(),
        default_city.is_some(),
        config.is_configured(),
    );

    let api_key = match api_key {
        Some(key) => Some(key),
        None if prompts.api_key => Some(prompt_api_key()?),
        None => None,
    };
    let default_city = match default_city {
        Some(city) => Some(city),
        None if prompts.default_city => Some(prompt_default_city(&config.default_city)?),
        None => None,
    };

    if let Some(key) = api_key {
        config.set_api_key(key.trim().to_string());
    }
    if let Some(city) = default_city {
        config.set_default_city(&city);
    }

    if !config.is_configured() {
        anyhow::bail!(
            "An API key is required. Get one at https://openweathermap.org/api"
        );
    }

    config.save()?;
    let path = Config::config_file_path()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
