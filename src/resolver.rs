//! Resolution orchestration for civix-locate.
//!
//! The `Resolver` walks an ordered list of geocoding providers, awaiting
//! each to settlement before trying the next, and stops at the first usable
//! answer. When the whole chain is exhausted it degrades to the directional
//! coordinate string, so every resolution attempt produces exactly one
//! displayable value: a place name or the raw coordinates, never both,
//! never neither.
//!
//! Provider failures never escape this module. A transport error, a non-2xx
//! status, or a response without usable fields all mean the same thing
//! here: try the next provider.

use log::{debug, info, warn};
use std::fmt;

use crate::config::Config;
use crate::coord::Coordinate;
use crate::geocode::{GeocodingProvider, default_provider_chain};

/// Source label attached when the chain is exhausted and only the raw
/// coordinates remain
pub const COORDINATES_ONLY: &str = "coordinates only";

/// The single displayable outcome of one resolution attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLocation {
    /// A provider produced a place name
    Place {
        /// Human-readable place, e.g. "Bengaluru, India"
        display_name: String,
        /// Which provider answered
        source: String,
    },
    /// Every provider fell through; the directional coordinate string is
    /// shown instead
    CoordinatesOnly {
        /// Formatted coordinates, e.g. "12.971600°N, 77.594600°E"
        display: String,
    },
}

impl ResolvedLocation {
    /// The string shown to the user
    pub fn display(&self) -> &str {
        match self {
            Self::Place { display_name, .. } => display_name,
            Self::CoordinatesOnly { display } => display,
        }
    }

    /// Where the displayed value came from
    pub fn source(&self) -> &str {
        match self {
            Self::Place { source, .. } => source,
            Self::CoordinatesOnly { .. } => COORDINATES_ONLY,
        }
    }
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Tries providers in priority order, stopping at the first usable answer
pub struct Resolver {
    providers: Vec<Box<dyn GeocodingProvider>>,
}

impl Resolver {
    /// Creates a resolver over an explicit provider chain
    pub fn new(providers: Vec<Box<dyn GeocodingProvider>>) -> Self {
        Self { providers }
    }

    /// Creates a resolver over the default three-provider chain
    pub fn from_config(config: &Config) -> Self {
        Self::new(default_provider_chain(config))
    }

    /// Resolves a coordinate into a displayable location.
    ///
    /// Total over valid coordinates: provider errors are logged and
    /// swallowed, and exhaustion degrades to the coordinate formatter
    /// rather than failing. Providers run strictly one at a time; each
    /// request is awaited to completion before the next is issued.
    pub async fn resolve(&self, coord: &Coordinate) -> ResolvedLocation {
        info!("Detecting location for {coord}");

        for provider in &self.providers {
            match provider.resolve(coord).await {
                Ok(Some(display_name)) => {
                    info!("Location detected via {}", provider.name());
                    return ResolvedLocation::Place {
                        display_name,
                        source: provider.name().to_string(),
                    };
                }
                Ok(None) => {
                    debug!("{} answered without usable place fields", provider.name());
                }
                Err(err) => {
                    warn!("{} lookup failed: {err:#}", provider.name());
                }
            }
        }

        debug!("All providers exhausted, showing raw coordinates");
        ResolvedLocation::CoordinatesOnly {
            display: coord.directional(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{FailingProvider, RecordingProvider, StaticProvider};
    use std::sync::{Arc, Mutex};

    fn coord() -> Coordinate {
        Coordinate::new(12.9716, 77.5946).unwrap()
    }

    #[tokio::test]
    async fn test_first_usable_answer_wins() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let resolver = Resolver::new(vec![
            Box::new(RecordingProvider::new(
                StaticProvider::new("primary", Some("Bengaluru, India")),
                Arc::clone(&log),
            )),
            Box::new(RecordingProvider::new(
                StaticProvider::new("secondary", Some("Wrong Answer, Nowhere")),
                Arc::clone(&log),
            )),
        ]);

        let resolved = resolver.resolve(&coord()).await;
        assert_eq!(
            resolved,
            ResolvedLocation::Place {
                display_name: "Bengaluru, India".to_string(),
                source: "primary".to_string(),
            }
        );

        // The second provider must never have been touched.
        let calls = log.lock().unwrap();
        assert_eq!(*calls, ["primary start", "primary settled"]);
    }

    #[tokio::test]
    async fn test_empty_and_error_results_fall_through() {
        let resolver = Resolver::new(vec![
            Box::new(StaticProvider::new("empty", None)),
            Box::new(FailingProvider::new("broken")),
            Box::new(StaticProvider::new("third", Some("Mysuru, India"))),
        ]);

        let resolved = resolver.resolve(&coord()).await;
        assert_eq!(resolved.display(), "Mysuru, India");
        assert_eq!(resolved.source(), "third");
    }

    #[tokio::test]
    async fn test_exhausted_chain_degrades_to_coordinates() {
        let resolver = Resolver::new(vec![
            Box::new(FailingProvider::new("first")),
            Box::new(FailingProvider::new("second")),
            Box::new(FailingProvider::new("third")),
        ]);

        let resolved = resolver.resolve(&coord()).await;
        assert_eq!(
            resolved,
            ResolvedLocation::CoordinatesOnly {
                display: "12.971600°N, 77.594600°E".to_string(),
            }
        );
        assert_eq!(resolved.source(), COORDINATES_ONLY);
    }

    #[tokio::test]
    async fn test_empty_chain_still_produces_a_value() {
        let resolver = Resolver::new(Vec::new());

        let resolved = resolver.resolve(&coord()).await;
        assert_eq!(resolved.display(), "12.971600°N, 77.594600°E");
    }

    #[tokio::test]
    async fn test_providers_run_strictly_in_sequence() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let resolver = Resolver::new(vec![
            Box::new(RecordingProvider::new(
                FailingProvider::new("first"),
                Arc::clone(&log),
            )),
            Box::new(RecordingProvider::new(
                StaticProvider::new("second", None),
                Arc::clone(&log),
            )),
            Box::new(RecordingProvider::new(
                FailingProvider::new("third"),
                Arc::clone(&log),
            )),
        ]);

        resolver.resolve(&coord()).await;

        // Every provider settles before the next one starts.
        let calls = log.lock().unwrap();
        assert_eq!(
            *calls,
            [
                "first start",
                "first settled",
                "second start",
                "second settled",
                "third start",
                "third settled",
            ]
        );
    }

    #[tokio::test]
    async fn test_display_formats_the_shown_value() {
        let place = ResolvedLocation::Place {
            display_name: "Bengaluru, India".to_string(),
            source: "BigDataCloud".to_string(),
        };
        assert_eq!(format!("{place}"), "Bengaluru, India");

        let fallback = ResolvedLocation::CoordinatesOnly {
            display: "12.500000°S, 45.250000°W".to_string(),
        };
        assert_eq!(format!("{fallback}"), "12.500000°S, 45.250000°W");
    }
}
