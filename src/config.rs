use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::acquire::AcquireOptions;
use crate::coord::Coordinate;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Language for locality names returned by BigDataCloud
    pub locality_language: String,
    /// Nominatim zoom level; 10 gives city-level detail
    pub nominatim_zoom: u8,
    /// Search radius in kilometers for the wide BigDataCloud query
    pub radius_km: u32,
    /// IP address geolocated by the `locate` command
    pub geolocate_ip: String,
    /// How long to wait for a position fix, in seconds
    pub timeout_secs: u64,
    /// Reference city used for the distance diagnostic
    pub reference_name: String,
    pub reference_latitude: f64,
    pub reference_longitude: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locality_language: "en".to_string(),
            nominatim_zoom: 10,
            radius_km: 50,
            geolocate_ip: "1.1.1.1".to_string(),
            timeout_secs: 30,
            reference_name: "Bengaluru".to_string(),
            reference_latitude: 12.9716,
            reference_longitude: 77.5946,
        }
    }
}

impl Config {
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Ok(config)
    }

    pub fn get_config_path(config_arg: &Option<PathBuf>) -> PathBuf {
        config_arg
            .clone()
            .unwrap_or_else(|| PathBuf::from("civix.yaml"))
    }

    /// Acquisition options with the configured timeout
    pub fn acquire_options(&self) -> AcquireOptions {
        AcquireOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            ..AcquireOptions::default()
        }
    }

    /// The reference city's position, for the distance diagnostic
    pub fn reference_coordinate(&self) -> Result<Coordinate> {
        Coordinate::new(self.reference_latitude, self.reference_longitude)
            .with_context(|| format!("Invalid reference coordinates for {}", self.reference_name))
    }
}
