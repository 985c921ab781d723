//! Position acquisition for civix-locate.
//!
//! This module obtains the user's current coordinates. The platform location
//! capability is modeled as the `LocationSource` port so callers can inject a
//! real source or a test fake. The shipped implementation,
//! `IpLocationSource`, approximates the device position from IP geolocation
//! via the ip-api.com service.
//!
//! Acquisition failures are fatal to a resolution attempt: unlike provider
//! failures inside the geocoding chain, they surface directly to the user
//! with a cause-specific message and are never retried automatically.

use async_trait::async_trait;
use ipgeolocate::{Locator, Service};
use log::{info, warn};
use std::time::Duration;
use thiserror::Error;

use crate::coord::Coordinate;

/// Options recognized when requesting a position fix
#[derive(Debug, Clone, Copy)]
pub struct AcquireOptions {
    /// Prefer the most precise fix the source can provide
    pub high_accuracy: bool,
    /// How long to wait for a fix before giving up
    pub timeout: Duration,
    /// Maximum acceptable age of a cached fix; zero forces a fresh one
    pub maximum_age: Duration,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(30),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Why a position fix could not be obtained.
///
/// Each variant carries its own user-facing message; callers surface these
/// directly rather than wrapping them in generic error text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquisitionError {
    #[error("Location access was denied. Allow location access and try again.")]
    PermissionDenied,
    #[error("Your position could not be determined. Check your network connection and try again.")]
    PositionUnavailable,
    #[error("Timed out waiting for a position fix. Try again in a moment.")]
    Timeout,
    #[error("Could not obtain your location due to an unexpected error.")]
    Unknown,
}

/// Port for anything that can produce the user's current position
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_position(
        &self,
        options: &AcquireOptions,
    ) -> Result<Coordinate, AcquisitionError>;
}

/// Approximates the device position by geolocating an IP address.
///
/// Uses the [IpApi](https://ip-api.com/) service. IP geolocation is
/// city-level at best, so `high_accuracy` is advisory here; every lookup is
/// a fresh query, which satisfies a `maximum_age` of zero.
pub struct IpLocationSource {
    ip: String,
}

impl IpLocationSource {
    pub fn new(ip: impl Into<String>) -> Self {
        Self { ip: ip.into() }
    }
}

#[async_trait]
impl LocationSource for IpLocationSource {
    async fn current_position(
        &self,
        options: &AcquireOptions,
    ) -> Result<Coordinate, AcquisitionError> {
        let lookup = Locator::get(&self.ip, Service::IpApi);

        let located = match tokio::time::timeout(options.timeout, lookup).await {
            Ok(Ok(located)) => located,
            Ok(Err(err)) => {
                warn!("IP geolocation for {} failed: {err}", self.ip);
                return Err(AcquisitionError::PositionUnavailable);
            }
            Err(_) => return Err(AcquisitionError::Timeout),
        };

        let latitude = located
            .latitude
            .parse::<f64>()
            .map_err(|_| AcquisitionError::Unknown)?;
        let longitude = located
            .longitude
            .parse::<f64>()
            .map_err(|_| AcquisitionError::Unknown)?;

        let coord =
            Coordinate::new(latitude, longitude).map_err(|_| AcquisitionError::Unknown)?;
        info!("Position fix for {}: {coord}", self.ip);

        Ok(coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_options() {
        let options = AcquireOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.maximum_age, Duration::ZERO);
    }

    #[test]
    fn test_acquisition_messages_are_exact() {
        assert_eq!(
            AcquisitionError::PermissionDenied.to_string(),
            "Location access was denied. Allow location access and try again."
        );
        assert_eq!(
            AcquisitionError::PositionUnavailable.to_string(),
            "Your position could not be determined. Check your network connection and try again."
        );
        assert_eq!(
            AcquisitionError::Timeout.to_string(),
            "Timed out waiting for a position fix. Try again in a moment."
        );
        assert_eq!(
            AcquisitionError::Unknown.to_string(),
            "Could not obtain your location due to an unexpected error."
        );
    }

    #[test]
    fn test_acquisition_messages_are_distinct() {
        let messages: HashSet<String> = [
            AcquisitionError::PermissionDenied,
            AcquisitionError::PositionUnavailable,
            AcquisitionError::Timeout,
            AcquisitionError::Unknown,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        assert_eq!(messages.len(), 4, "Each cause needs its own message");
    }
}
