//! BigDataCloud reverse-geocoding adapter.
//!
//! Adapts the BigDataCloud client-side reverse-geocode endpoint to the
//! `GeocodingProvider` interface. The same adapter serves two slots in the
//! default chain: the standard locality query, and a second pass with an
//! explicit `radius` parameter that widens locality matching when the
//! earlier providers come up empty.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::coord::Coordinate;
use crate::geocode::{GeocodingProvider, display_name, non_empty};

/// Production endpoint; tests point the adapter at a local mock server
pub const DEFAULT_BASE_URL: &str = "https://api.bigdatacloud.net";

/// Reverse-geocoding adapter for the BigDataCloud locality API
pub struct BigDataCloudProvider {
    client: Client,
    base_url: String,
    language: String,
    radius_km: Option<u32>,
}

/// The subset of the response this adapter reads
#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    locality: Option<String>,
    #[serde(default, rename = "countryName")]
    country_name: Option<String>,
}

impl BigDataCloudProvider {
    /// Creates an adapter for the standard locality query
    pub fn new(client: Client, language: &str) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            language: language.to_string(),
            radius_km: None,
        }
    }

    /// Adds an explicit search radius, turning this into the wide-radius
    /// variant used as the chain's last resort
    pub fn with_radius_km(mut self, radius_km: u32) -> Self {
        self.radius_km = Some(radius_km);
        self
    }

    /// Overrides the endpoint base URL (for tests)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn request_url(&self, coord: &Coordinate) -> Result<Url> {
        let mut params = vec![
            ("latitude", coord.latitude.to_string()),
            ("longitude", coord.longitude.to_string()),
            ("localityLanguage", self.language.clone()),
        ];

        if let Some(radius_km) = self.radius_km {
            params.push(("radius", radius_km.to_string()));
        }

        Url::parse_with_params(
            &format!("{}/data/reverse-geocode-client", self.base_url),
            &params,
        )
        .context("Failed to build BigDataCloud request URL")
    }
}

/// Extracts a display name from a response, or `None` when the fields
/// needed to name a place are missing.
///
/// A country is required; within the response, `city` wins over `locality`,
/// and a bare country is accepted when neither is present.
fn extract_place(response: ReverseGeocodeResponse) -> Option<String> {
    let country = non_empty(response.country_name)?;
    let place = non_empty(response.city).or_else(|| non_empty(response.locality));

    Some(display_name(place.as_deref(), &country))
}

#[async_trait]
impl GeocodingProvider for BigDataCloudProvider {
    fn name(&self) -> &str {
        if self.radius_km.is_some() {
            "BigDataCloud (wide radius)"
        } else {
            "BigDataCloud"
        }
    }

    async fn resolve(&self, coord: &Coordinate) -> Result<Option<String>> {
        let url = self.request_url(coord)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("BigDataCloud request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("BigDataCloud returned status {}", response.status());
        }

        let body: ReverseGeocodeResponse = response
            .json()
            .await
            .context("Failed to parse BigDataCloud response")?;

        Ok(extract_place(body))
    }
}
