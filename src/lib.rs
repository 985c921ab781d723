//! # civix-locate
//!
//! Location resolution for the Civix citizen portal: converts a device's raw
//! coordinates into a human-readable place name through a prioritized chain
//! of reverse-geocoding providers, degrading gracefully to a formatted
//! coordinate string when every provider fails.
//!
//! ## Features
//!
//! - Position acquisition behind an injectable `LocationSource` port, with
//!   an IP-geolocation implementation for desktop use
//! - Sequential provider fallback: BigDataCloud, then OpenStreetMap
//!   Nominatim, then BigDataCloud with a wide search radius
//! - Directional coordinate formatting as the always-available last resort
//! - Distance-from-reference-city diagnostic logging
//! - YAML configuration with an `init` command to scaffold it

// Export modules for integration testing
pub mod acquire;
pub mod bigdatacloud;
pub mod config;
pub mod coord;
pub mod geocode;
pub mod mock;
pub mod nominatim;
pub mod resolver;
