//! City name to current conditions, in two sequential lookups.

use tracing::{debug, info, warn};

use crate::{
    error::{ErrorKind, FetchError},
    model::{DisplayRecord, GeoCandidate, Query},
    provider::WeatherProvider,
};

/// Only the first geocoding match is ever used.
const GEOCODE_LIMIT: u8 = 1;

#[derive(Debug)]
pub struct Pipeline {
    provider: Box<dyn WeatherProvider>,
    default_country: String,
}

impl Pipeline {
    pub fn new(provider: Box<dyn WeatherProvider>, default_country: impl Into<String>) -> Self {
        Self { provider, default_country: default_country.into() }
    }

    pub fn default_country(&self) -> &str {
        &self.default_country
    }

    /// Validate, geocode (with at most one country-qualified retry), fetch
    /// current weather and merge both into a [`DisplayRecord`].
    pub async fn resolve(&self, raw: &str) -> Result<DisplayRecord, ErrorKind> {
        let query = Query::parse(raw)?;

        let candidate = self.locate(&query).await?;
        debug!(
            name = %candidate.name,
            lat = candidate.lat,
            lon = candidate.lon,
            "using first geocoding match"
        );

        let snapshot = self
            .provider
            .current_weather(candidate.lat, candidate.lon)
            .await
            .map_err(|err| match err {
                FetchError::Status { status, .. } => {
                    warn!(%status, "weather request rejected");
                    ErrorKind::WeatherFetchFailed
                }
                other => {
                    warn!(error = %other, "weather request failed");
                    ErrorKind::ConnectionFailed
                }
            })?;

        let record = DisplayRecord::assemble(candidate, snapshot);
        info!(name = %record.name, place = %record.place_label(), "lookup succeeded");

        Ok(record)
    }

    async fn locate(&self, query: &Query) -> Result<GeoCandidate, ErrorKind> {
        let mut found = self.geocode(query).await?;

        if found.is_empty() && !query.mentions_country(&self.default_country) {
            let qualified = query.with_country(&self.default_country);
            info!(%query, fallback = %qualified, "no match, retrying with default country");
            found = self.geocode(&qualified).await?;
        }

        found.into_iter().next().ok_or_else(|| {
            info!(%query, "city not found");
            ErrorKind::CityNotFound
        })
    }

    async fn geocode(&self, query: &Query) -> Result<Vec<GeoCandidate>, ErrorKind> {
        // Any geocoding fault, a rejected status included, is a connection failure.
        self.provider.geocode(query.as_str(), GEOCODE_LIMIT).await.map_err(|err| {
            warn!(%query, error = %err, "geocoding request failed");
            ErrorKind::ConnectionFailed
        })
    }
}
