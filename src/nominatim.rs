//! OpenStreetMap Nominatim reverse-geocoding adapter.
//!
//! Second provider in the default chain. Queries the Nominatim `/reverse`
//! endpoint at a zoom level tuned for city-level detail and reads the
//! structured `address` block of the response. Nominatim's usage policy
//! requires an identifying `User-Agent`, so every request carries one.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use url::Url;

use crate::coord::Coordinate;
use crate::geocode::{GeocodingProvider, display_name, non_empty};

/// Production endpoint; tests point the adapter at a local mock server
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

const CLIENT_USER_AGENT: &str = concat!("civix-locate/", env!("CARGO_PKG_VERSION"));

/// Reverse-geocoding adapter for OpenStreetMap Nominatim
pub struct NominatimProvider {
    client: Client,
    base_url: String,
    zoom: u8,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
}

/// The address fields this adapter considers, broadest last
#[derive(Debug, Default, Deserialize)]
struct Address {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
    #[serde(default)]
    county: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

impl NominatimProvider {
    pub fn new(client: Client, zoom: u8) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            zoom,
        }
    }

    /// Overrides the endpoint base URL (for tests)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn request_url(&self, coord: &Coordinate) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}/reverse", self.base_url),
            &[
                ("lat", coord.latitude.to_string()),
                ("lon", coord.longitude.to_string()),
                ("zoom", self.zoom.to_string()),
                ("addressdetails", "1".to_string()),
                ("format", "jsonv2".to_string()),
            ],
        )
        .context("Failed to build Nominatim request URL")
    }
}

/// Extracts a display name from a response, or `None` when no usable
/// address fields are present.
///
/// A country is required; the finest available of city, town, village,
/// county, or state is joined with it, and the country alone is accepted
/// when none of them are present.
fn extract_place(response: ReverseResponse) -> Option<String> {
    let address = response.address?;
    let country = non_empty(address.country)?;

    let place = [
        address.city,
        address.town,
        address.village,
        address.county,
        address.state,
    ]
    .into_iter()
    .find_map(non_empty);

    Some(display_name(place.as_deref(), &country))
}

#[async_trait]
impl GeocodingProvider for NominatimProvider {
    fn name(&self) -> &str {
        "OpenStreetMap"
    }

    async fn resolve(&self, coord: &Coordinate) -> Result<Option<String>> {
        let url = self.request_url(coord)?;

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await
            .context("Nominatim request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Nominatim returned status {}", response.status());
        }

        let body: ReverseResponse = response
            .json()
            .await
            .context("Failed to parse Nominatim response")?;

        Ok(extract_place(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(fields: &[(&str, &str)]) -> ReverseResponse {
        let mut address = Address::default();
        for (key, value) in fields {
            let value = Some(value.to_string());
            match *key {
                "city" => address.city = value,
                "town" => address.town = value,
                "village" => address.village = value,
                "county" => address.county = value,
                "state" => address.state = value,
                "country" => address.country = value,
                other => panic!("Unknown address field in test: {other}"),
            }
        }
        ReverseResponse {
            address: Some(address),
        }
    }

    #[test]
    fn test_town_and_country() {
        let place = extract_place(address(&[("town", "Mysuru"), ("country", "India")]));
        assert_eq!(place, Some("Mysuru, India".to_string()));
    }

    #[test]
    fn test_city_preferred_over_broader_fields() {
        let place = extract_place(address(&[
            ("city", "Bengaluru"),
            ("county", "Bangalore Urban"),
            ("state", "Karnataka"),
            ("country", "India"),
        ]));
        assert_eq!(place, Some("Bengaluru, India".to_string()));
    }

    #[test]
    fn test_state_is_the_broadest_locality() {
        let place = extract_place(address(&[("state", "Karnataka"), ("country", "India")]));
        assert_eq!(place, Some("Karnataka, India".to_string()));
    }

    #[test]
    fn test_country_alone_is_accepted() {
        let place = extract_place(address(&[("country", "India")]));
        assert_eq!(place, Some("India".to_string()));
    }

    #[test]
    fn test_missing_country_yields_nothing() {
        assert_eq!(extract_place(address(&[("city", "Bengaluru")])), None);
    }

    #[test]
    fn test_missing_address_block_yields_nothing() {
        assert_eq!(extract_place(ReverseResponse { address: None }), None);
    }

    #[test]
    fn test_request_url_query_shape() -> Result<()> {
        let provider = NominatimProvider::new(Client::new(), 10);
        let coord = Coordinate::new(12.2958, 76.6394)?;

        let url = provider.request_url(&coord)?;
        assert_eq!(url.path(), "/reverse");

        let query = url.query().unwrap_or_default();
        assert!(query.contains("lat=12.2958"));
        assert!(query.contains("lon=76.6394"));
        assert!(query.contains("zoom=10"));
        assert!(query.contains("addressdetails=1"));
        assert!(query.contains("format=jsonv2"));

        Ok(())
    }
}
