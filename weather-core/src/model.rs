use chrono::{DateTime, Utc};
use std::fmt;

/// What the user asked to look up, decided once at the input boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Place name, postal code or landmark to be geocoded.
    ByText(String),
    /// Coordinates entered directly by the user.
    ByCoordinates(Coordinates),
}

/// A latitude/longitude pair in decimal degrees (WGS84).
///
/// Values are kept as the decimal text sent on the wire, so coordinates typed by
/// the user are forwarded and echoed back exactly as entered. No range or format
/// check is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    latitude: String,
    longitude: String,
}

impl Coordinates {
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
        }
    }

    /// Wrap user input as-is.
    pub fn from_raw(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    /// Numeric `(latitude, longitude)`, if both parts parse.
    pub fn degrees(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.trim().parse().ok()?;
        let lon = self.longitude.trim().parse().ok()?;
        Some((lat, lon))
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat={}, lon={}", self.latitude, self.longitude)
    }
}

/// Current conditions at one place, flattened from the provider payload.
///
/// Optional fields are `None` when the provider left them out.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// hPa
    pub pressure: f64,
    /// Percent.
    pub humidity: f64,
    /// Condition group, e.g. "Clear" or "Rain".
    pub condition: String,
    pub description: String,
    pub icon: String,
    /// m/s
    pub wind_speed: f64,
    pub wind_deg: Option<f64>,
    /// Cloud cover, percent.
    pub clouds: f64,
    /// Metres.
    pub visibility: Option<f64>,
    /// Rain volume over the last hour, mm.
    pub rain_1h: Option<f64>,
    /// Snow volume over the last hour, mm.
    pub snow_1h: Option<f64>,
    /// Unix seconds.
    pub sunrise: i64,
    pub sunset: i64,
    pub city: String,
    pub country: String,
}

impl WeatherSnapshot {
    pub fn sunrise_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.sunrise)
    }

    pub fn sunset_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.sunset)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
