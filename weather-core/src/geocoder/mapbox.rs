use anyhow::{Context, bail};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{Config, Coordinates, GeocodeError, error::truncate_body};

use super::Geocoder;

/// Mapbox Places (v5) forward geocoding.
#[derive(Debug, Clone)]
pub struct MapboxGeocoder {
    token: String,
    base_url: Url,
    limit: u8,
    http: Client,
}

impl MapboxGeocoder {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let token = config.geocoding_token()?.to_owned();

        let base_url = Url::parse(&config.geocoding.url)
            .with_context(|| format!("Invalid geocoding URL: {}", config.geocoding.url))?;
        if base_url.cannot_be_a_base() {
            bail!("Invalid geocoding URL: {}", config.geocoding.url);
        }

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client for Mapbox")?;

        Ok(Self {
            token,
            base_url,
            limit: config.geocoding.limit.max(1),
            http,
        })
    }

    /// `{base}/{query}.json?access_token=..&limit=..`, with the query as one
    /// percent-encoded path segment.
    fn request_url(&self, query: &str) -> Result<Url, GeocodeError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                GeocodeError::Unavailable(format!("Invalid geocoding URL: {}", self.base_url))
            })?
            .pop_if_empty()
            .push(&format!("{query}.json"));

        url.query_pairs_mut()
            .append_pair("access_token", &self.token)
            .append_pair("limit", &self.limit.to_string());

        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    /// Absent and `null` both mean no match.
    features: Option<Vec<Feature>>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    /// `[longitude, latitude]`
    center: Option<Vec<f64>>,
    place_name: Option<String>,
}

/// Pick the first feature of a places response.
fn parse_places(query: &str, body: &str) -> Result<Coordinates, GeocodeError> {
    let parsed: PlacesResponse = serde_json::from_str(body)
        .map_err(|e| GeocodeError::MalformedResponse(e.to_string()))?;

    let feature = parsed
        .features
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NoMatch(query.to_string()))?;

    match feature.center.as_deref() {
        Some([lon, lat, ..]) => {
            debug!(place = feature.place_name.as_deref().unwrap_or("?"), "Best match");
            Ok(Coordinates::from_degrees(*lat, *lon))
        }
        _ => Err(GeocodeError::NoMatch(query.to_string())),
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    #[instrument(skip(self))]
    async fn locate(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        let url = self.request_url(query)?;
        debug!(path = url.path(), "Requesting Mapbox places");

        // reqwest errors carry the URL, and with it the access token.
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| GeocodeError::Unavailable(e.without_url().to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            GeocodeError::Unavailable(format!(
                "Failed to read Mapbox response body: {}",
                e.without_url()
            ))
        })?;
        debug!(%status, "Mapbox responded");

        if !status.is_success() {
            warn!(%status, "Mapbox request failed");
            return Err(GeocodeError::Unavailable(format!(
                "Mapbox returned status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        parse_places(query, &body)
    }
}
