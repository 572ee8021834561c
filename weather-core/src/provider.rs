use crate::{
    Config,
    error::FetchError,
    model::{GeoCandidate, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The two read-only endpoints the lookup pipeline depends on.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Forward geocode a free-text query; an empty vector means no match.
    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<GeoCandidate>, FetchError>;

    /// Current conditions at a coordinate.
    async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    let provider = OpenWeatherProvider::new(api_key, config)?;

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_builds_when_key_present() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
