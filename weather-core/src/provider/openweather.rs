use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    Config,
    error::FetchError,
    model::{GeoCandidate, WeatherSnapshot},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    geocoding_url: String,
    weather_url: String,
    language: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            geocoding_url: config.geocoding_url.clone(),
            weather_url: config.weather_url.clone(),
            language: config.language.clone(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let res = self
            .http
            .get(url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    lat: f64,
    lon: f64,
    country: String,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: Option<f64>,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl From<OwGeoEntry> for GeoCandidate {
    fn from(entry: OwGeoEntry) -> Self {
        Self {
            lat: entry.lat,
            lon: entry.lon,
            name: entry.name,
            state: entry.state,
            country: entry.country,
        }
    }
}

impl TryFrom<OwCurrentResponse> for WeatherSnapshot {
    type Error = FetchError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let condition = parsed
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::Malformed("weather response has no condition entry".into()))?;

        Ok(Self {
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like.unwrap_or(parsed.main.temp),
            condition_code: condition.main,
            description: condition.description,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            icon: condition.icon,
            observed_at: parsed.dt.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<GeoCandidate>, FetchError> {
        debug!(query, limit, "geocoding request");

        let limit = limit.to_string();
        let entries: Vec<OwGeoEntry> =
            self.get_json(&self.geocoding_url, &[("q", query), ("limit", limit.as_str())]).await?;

        Ok(entries.into_iter().map(GeoCandidate::from).collect())
    }

    async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, FetchError> {
        debug!(lat, lon, "current weather request");

        let lat = lat.to_string();
        let lon = lon.to_string();
        let parsed: OwCurrentResponse = self
            .get_json(
                &self.weather_url,
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("units", "metric"),
                    ("lang", self.language.as_str()),
                ],
            )
            .await?;

        WeatherSnapshot::try_from(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
