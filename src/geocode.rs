//! Reverse geocoding for civix-locate.
//!
//! This module defines the `GeocodingProvider` trait that every external
//! reverse-geocoding service is adapted to, along with the factory that
//! assembles the default provider chain in priority order:
//!
//! 1. BigDataCloud (standard locality query)
//! 2. OpenStreetMap Nominatim (city-level reverse geocode)
//! 3. BigDataCloud again, with a wide search radius
//!
//! Each adapter knows how to build a request for one service and extract a
//! place name from that service's response shape. Adapters are stateless;
//! the orchestrator in `resolver` owns the fallback sequencing.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use crate::bigdatacloud::BigDataCloudProvider;
use crate::config::Config;
use crate::coord::Coordinate;
use crate::nominatim::NominatimProvider;

/// Interface for reverse geocoding services
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Short provider name, used as the source label on results
    fn name(&self) -> &str;

    /// Attempts to turn a coordinate into a display name.
    ///
    /// `Ok(Some(_))` is a usable place name. `Ok(None)` means the service
    /// answered without the fields needed to name a place; `Err` is any
    /// transport, HTTP, or parse failure. Callers treat the latter two
    /// identically and move on to the next provider.
    async fn resolve(&self, coord: &Coordinate) -> Result<Option<String>>;
}

/// Builds the default provider chain from configuration.
///
/// Providers share one HTTP client and are returned in priority order; the
/// wide-radius BigDataCloud query runs last because it trades precision for
/// coverage.
pub fn default_provider_chain(config: &Config) -> Vec<Box<dyn GeocodingProvider>> {
    let client = Client::new();

    vec![
        Box::new(BigDataCloudProvider::new(
            client.clone(),
            &config.locality_language,
        )),
        Box::new(NominatimProvider::new(client.clone(), config.nominatim_zoom)),
        Box::new(
            BigDataCloudProvider::new(client, &config.locality_language)
                .with_radius_km(config.radius_km),
        ),
    ]
}

/// Joins an optional locality-level place with its country, falling back to
/// the country alone
pub(crate) fn display_name(place: Option<&str>, country: &str) -> String {
    match place {
        Some(place) => format!("{place}, {country}"),
        None => country.to_string(),
    }
}

/// Drops empty strings so absent and blank response fields look the same
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_with_place() {
        assert_eq!(display_name(Some("Bengaluru"), "India"), "Bengaluru, India");
    }

    #[test]
    fn test_display_name_country_only() {
        assert_eq!(display_name(None, "India"), "India");
    }

    #[test]
    fn test_non_empty_filters_blank_fields() {
        assert_eq!(
            non_empty(Some("Mysuru".to_string())),
            Some("Mysuru".to_string())
        );
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_default_chain_priority_order() {
        let config = Config::default();
        let chain = default_provider_chain(&config);

        let names: Vec<&str> = chain.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec!["BigDataCloud", "OpenStreetMap", "BigDataCloud (wide radius)"]
        );
    }
}
