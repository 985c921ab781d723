//! Coordinate handling for civix-locate.
//!
//! This module defines the `Coordinate` value type used throughout the
//! resolution pipeline, along with the directional formatter that renders a
//! latitude/longitude pair as a human-readable string. The formatted string
//! doubles as the last-resort display value when every geocoding provider
//! fails, and as debug output for the raw position fix.
//!
//! Coordinates are validated on construction: both components must be finite
//! and within the WGS84 ranges (-90..90 latitude, -180..180 longitude), so
//! everything downstream can assume a well-formed position.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in kilometers, used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A validated geographic position in decimal degrees (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees, -90..=90
    pub latitude: f64,
    /// Longitude in decimal degrees, -180..=180
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting non-finite or out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            bail!("Coordinates must be finite numbers, got ({latitude}, {longitude})");
        }
        if !(-90.0..=90.0).contains(&latitude) {
            bail!("Latitude {latitude} is out of range (-90 to 90)");
        }
        if !(-180.0..=180.0).contains(&longitude) {
            bail!("Longitude {longitude} is out of range (-180 to 180)");
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Renders the coordinate as a directional string, e.g.
    /// `12.971600°N, 77.594600°E`. Non-negative values map to N/E.
    pub fn directional(&self) -> String {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        format!(
            "{:.6}°{}, {:.6}°{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }

    /// Great-circle distance to another coordinate in kilometers (haversine)
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.directional())
    }
}
