//! Test doubles for the resolution pipeline.
//!
//! Fakes for the two injected capabilities: geocoding providers and the
//! position source. Unit and integration tests use these to drive the
//! orchestrator without real device APIs or network access.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::acquire::{AcquireOptions, AcquisitionError, LocationSource};
use crate::coord::Coordinate;
use crate::geocode::GeocodingProvider;

/// A provider that always answers with the same place (or lack of one)
pub struct StaticProvider {
    name: String,
    place: Option<String>,
}

impl StaticProvider {
    pub fn new(name: &str, place: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            place: place.map(str::to_string),
        }
    }
}

#[async_trait]
impl GeocodingProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, _coord: &Coordinate) -> Result<Option<String>> {
        Ok(self.place.clone())
    }
}

/// A provider whose every lookup fails, simulating a network error
pub struct FailingProvider {
    name: String,
}

impl FailingProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl GeocodingProvider for FailingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, _coord: &Coordinate) -> Result<Option<String>> {
        anyhow::bail!("simulated network error from {}", self.name)
    }
}

/// Wraps a provider and appends "start"/"settled" markers to a shared log,
/// so tests can assert that lookups never overlap
pub struct RecordingProvider<P> {
    inner: P,
    log: Arc<Mutex<Vec<String>>>,
}

impl<P: GeocodingProvider> RecordingProvider<P> {
    pub fn new(inner: P, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self { inner, log }
    }
}

#[async_trait]
impl<P: GeocodingProvider> GeocodingProvider for RecordingProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn resolve(&self, coord: &Coordinate) -> Result<Option<String>> {
        self.log
            .lock()
            .unwrap()
            .push(format!("{} start", self.inner.name()));
        let outcome = self.inner.resolve(coord).await;
        self.log
            .lock()
            .unwrap()
            .push(format!("{} settled", self.inner.name()));
        outcome
    }
}

/// A position source that always returns the same fix
pub struct FixedLocationSource {
    coordinate: Coordinate,
}

impl FixedLocationSource {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

#[async_trait]
impl LocationSource for FixedLocationSource {
    async fn current_position(
        &self,
        _options: &AcquireOptions,
    ) -> Result<Coordinate, AcquisitionError> {
        Ok(self.coordinate)
    }
}

/// A position source that always fails with the given cause
pub struct FailingLocationSource {
    error: AcquisitionError,
}

impl FailingLocationSource {
    pub fn new(error: AcquisitionError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl LocationSource for FailingLocationSource {
    async fn current_position(
        &self,
        _options: &AcquireOptions,
    ) -> Result<Coordinate, AcquisitionError> {
        Err(self.error.clone())
    }
}
