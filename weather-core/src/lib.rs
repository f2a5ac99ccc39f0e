//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Forward geocoding of place queries (Mapbox)
//! - Current-weather lookup by coordinates (OpenWeather)
//! - Shared domain models and typed errors
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod geocoder;
pub mod model;
pub mod provider;

pub use config::{Config, GeocodingConfig, WeatherServiceConfig};
pub use error::{GeocodeError, WeatherError};
pub use geocoder::{Geocoder, geocoder_from_config};
pub use model::{Coordinates, LocationQuery, WeatherSnapshot};
pub use provider::{WeatherProvider, provider_from_config};
