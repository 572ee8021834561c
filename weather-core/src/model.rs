use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// A trimmed, non-empty location query such as `"Maricá"` or `"Maricá, RJ"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self, ErrorKind> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ErrorKind::EmptyQuery);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the user already signalled `country` anywhere in the query.
    ///
    /// This is a loose, case-insensitive substring match: `"Maricá, br"`
    /// counts, and so does `"Brasília"`.
    pub fn mentions_country(&self, country: &str) -> bool {
        self.0.to_uppercase().contains(&country.to_uppercase())
    }

    pub fn with_country(&self, country: &str) -> Self {
        Self(format!("{}, {}", self.0, country))
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One geocoding match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoCandidate {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub state: Option<String>,
    pub country: String,
}

/// Current conditions at a coordinate, metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub condition_code: String,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub icon: String,
    pub observed_at: Option<DateTime<Utc>>,
}

/// Render-ready result of one successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub name: String,
    pub state: Option<String>,
    pub country: String,
    pub temperature_c: i32,
    pub feels_like_c: i32,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub condition_code: String,
    pub description: String,
    pub icon: String,
    pub observed_at: Option<DateTime<Utc>>,
}

impl DisplayRecord {
    pub fn assemble(candidate: GeoCandidate, snapshot: WeatherSnapshot) -> Self {
        Self {
            name: candidate.name,
            state: candidate.state,
            country: candidate.country,
            temperature_c: round_for_display(snapshot.temperature_c),
            feels_like_c: round_for_display(snapshot.feels_like_c),
            humidity_pct: snapshot.humidity_pct,
            wind_speed_mps: snapshot.wind_speed_mps,
            condition_code: snapshot.condition_code,
            description: snapshot.description,
            icon: snapshot.icon,
            observed_at: snapshot.observed_at,
        }
    }

    /// `"RJ, BR"`, or just the country when the match has no state.
    pub fn place_label(&self) -> String {
        match self.state.as_deref() {
            Some(state) if !state.is_empty() => format!("{state}, {}", self.country),
            _ => self.country.clone(),
        }
    }

    /// Substitute the icon key into a template such as
    /// `https://openweathermap.org/img/wn/{icon}@4x.png`.
    pub fn icon_url(&self, template: &str) -> String {
        template.replace("{icon}", &self.icon)
    }
}

/// Nearest integer, halves rounded up (`-2.5` becomes `-2`).
fn round_for_display(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
