//! Scripted in-memory provider shared by the unit tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::Notify;

use crate::{
    error::FetchError,
    model::{GeoCandidate, WeatherSnapshot},
    provider::WeatherProvider,
};

type GeoReply = Result<Vec<GeoCandidate>, FetchError>;
type WeatherReply = Result<WeatherSnapshot, FetchError>;

#[derive(Debug, Default)]
struct Script {
    geocode: VecDeque<GeoReply>,
    weather: VecDeque<WeatherReply>,
    geocode_calls: Vec<String>,
    weather_calls: Vec<(f64, f64)>,
    gates: HashMap<String, Arc<Notify>>,
}

/// Replays queued replies in order and records every call.
///
/// An exhausted geocode script answers with no match; an exhausted weather
/// script answers with a 500.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    script: Arc<Mutex<Script>>,
}

impl ScriptedProvider {
    pub fn geocode_reply(self, reply: GeoReply) -> Self {
        self.script.lock().unwrap().geocode.push_back(reply);
        self
    }

    pub fn weather_reply(self, reply: WeatherReply) -> Self {
        self.script.lock().unwrap().weather.push_back(reply);
        self
    }

    /// Hold geocoding of `query` until the returned handle is notified.
    pub fn gate(&self, query: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.script.lock().unwrap().gates.insert(query.to_string(), notify.clone());
        notify
    }

    pub fn geocode_calls(&self) -> Vec<String> {
        self.script.lock().unwrap().geocode_calls.clone()
    }

    pub fn weather_calls(&self) -> Vec<(f64, f64)> {
        self.script.lock().unwrap().weather_calls.clone()
    }
}

#[async_trait]
impl WeatherProvider for ScriptedProvider {
    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<GeoCandidate>, FetchError> {
        assert_eq!(limit, 1);
        let (gate, reply) = {
            let mut script = self.script.lock().unwrap();
            script.geocode_calls.push(query.to_string());
            (script.gates.get(query).cloned(), script.geocode.pop_front())
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        reply.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, FetchError> {
        let mut script = self.script.lock().unwrap();
        script.weather_calls.push((lat, lon));
        script.weather.pop_front().unwrap_or_else(|| Err(status(500)))
    }
}

pub fn marica() -> GeoCandidate {
    GeoCandidate {
        lat: -22.92,
        lon: -42.82,
        name: "Maricá".into(),
        state: Some("RJ".into()),
        country: "BR".into(),
    }
}

pub fn marica_weather() -> WeatherSnapshot {
    WeatherSnapshot {
        temperature_c: 27.4,
        feels_like_c: 29.6,
        condition_code: "Clear".into(),
        description: "céu limpo".into(),
        humidity_pct: 80,
        wind_speed_mps: 3.1,
        icon: "01d".into(),
        observed_at: None,
    }
}

pub fn status(code: u16) -> FetchError {
    FetchError::Status {
        status: StatusCode::from_u16(code).unwrap(),
        body: String::new(),
    }
}

pub fn malformed() -> FetchError {
    FetchError::Decode(serde_json::from_str::<Vec<u8>>("<html>").unwrap_err())
}
