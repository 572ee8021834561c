use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Password;
use weather_core::{Config, PipelineState, session_from_config};

use crate::render::render_state;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "city-weather", version, about = "Current weather for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for a city, e.g. `Maricá, RJ`.
    Show {
        /// City name, optionally followed by `, <state>`.
        #[arg(num_args = 0..)]
        query: Vec<String>,

        /// Print the final state as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the config file location.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure().map(|()| ExitCode::SUCCESS),
            Command::Show { query, json } => show(&query.join(" "), json).await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Render every state transition; a failed lookup exits non-zero.
async fn show(query: &str, json: bool) -> anyhow::Result<ExitCode> {
    let config = Config::load()?;
    let session = session_from_config(&config)?;
    let mut states = session.subscribe();

    let handle = session.trigger_search(query);
    tracing::debug!(run = handle.id, query, "search started");

    let final_state = loop {
        states.changed().await.context("search session closed")?;
        let state = states.borrow_and_update().clone();

        if !json {
            println!("{}", render_state(&state, &config.icon_url_template));
        }
        if state.is_terminal() {
            break state;
        }
    };

    handle.task.await.context("search task panicked")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&final_state)?);
    }

    match final_state {
        PipelineState::Failure(_) => Ok(ExitCode::FAILURE),
        _ => Ok(ExitCode::SUCCESS),
    }
}
