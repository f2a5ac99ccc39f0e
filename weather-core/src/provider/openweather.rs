use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{Config, Coordinates, WeatherError, WeatherSnapshot, error::truncate_body};

use super::WeatherProvider;

/// Readings are always requested in metric units; the report labels assume it.
const UNITS: &str = "metric";
const LANG: &str = "en";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    url: Url,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.weather_api_key()?.to_owned();

        let url = Url::parse(&config.weather.url)
            .with_context(|| format!("Invalid weather URL: {}", config.weather.url))?;

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            url,
            http,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct OwVolume {
    #[serde(rename = "1h")]
    last_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    clouds: OwClouds,
    visibility: Option<f64>,
    rain: Option<OwVolume>,
    snow: Option<OwVolume>,
    sys: OwSys,
}

/// Flatten a current-weather payload into a snapshot.
fn parse_current(body: &str) -> Result<WeatherSnapshot, WeatherError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::MalformedResponse(e.to_string()))?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::MalformedResponse("empty `weather` list".to_string()))?;

    Ok(WeatherSnapshot {
        temperature: parsed.main.temp,
        feels_like: parsed.main.feels_like,
        temp_min: parsed.main.temp_min,
        temp_max: parsed.main.temp_max,
        pressure: parsed.main.pressure,
        humidity: parsed.main.humidity,
        condition: weather.main,
        description: weather.description,
        icon: weather.icon,
        wind_speed: parsed.wind.speed,
        wind_deg: parsed.wind.deg,
        clouds: parsed.clouds.all,
        visibility: parsed.visibility,
        rain_1h: parsed.rain.and_then(|v| v.last_hour),
        snow_1h: parsed.snow.and_then(|v| v.last_hour),
        sunrise: parsed.sys.sunrise,
        sunset: parsed.sys.sunset,
        city: parsed.name,
        country: parsed.sys.country,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, at), fields(lat = %at.latitude(), lon = %at.longitude()))]
    async fn current(&self, at: &Coordinates) -> Result<WeatherSnapshot, WeatherError> {
        debug!(url = %self.url, "Requesting current weather");

        let res = self
            .http
            .get(self.url.clone())
            .query(&[
                ("lat", at.latitude()),
                ("lon", at.longitude()),
                ("appid", self.api_key.as_str()),
                ("units", UNITS),
                ("lang", LANG),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Unavailable(e.without_url().to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Unavailable(format!(
                "Failed to read OpenWeather response body: {}",
                e.without_url()
            ))
        })?;
        debug!(%status, "OpenWeather responded");

        if !status.is_success() {
            warn!(%status, "OpenWeather request failed");
            return Err(WeatherError::Unavailable(format!(
                "OpenWeather returned status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        parse_current(&body)
    }
}
