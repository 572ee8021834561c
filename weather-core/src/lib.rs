//! Core library for the `city-weather` tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the geocoding and weather endpoints
//! - The lookup pipeline (city name -> coordinates -> current weather)
//! - An observable search session for front-ends
//!
//! It is used by `city-weather-cli`, but can also be reused by other front-ends.

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod session;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{ErrorKind, FetchError};
pub use model::{DisplayRecord, GeoCandidate, Query, WeatherSnapshot};
pub use pipeline::Pipeline;
pub use provider::{WeatherProvider, provider_from_config};
pub use session::{PipelineState, RunHandle, RunId, SearchSession};

/// Build a ready-to-use session from configuration.
pub fn session_from_config(config: &Config) -> anyhow::Result<SearchSession> {
    let provider = provider_from_config(config)?;
    Ok(SearchSession::new(Pipeline::new(provider, config.default_country.clone())))
}
