use crate::{Config, Coordinates, GeocodeError, geocoder::mapbox::MapboxGeocoder};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod mapbox;

/// Turns a free-form place query into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Resolve `query` to the best-ranked match.
    async fn locate(&self, query: &str) -> Result<Coordinates, GeocodeError>;
}

/// Construct the geocoder described by `config`.
pub fn geocoder_from_config(config: &Config) -> anyhow::Result<Box<dyn Geocoder>> {
    Ok(Box::new(MapboxGeocoder::from_config(config)?))
}
