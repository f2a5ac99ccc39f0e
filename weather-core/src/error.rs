use thiserror::Error;

/// Failure to turn a place query into coordinates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeocodeError {
    /// Network error, timeout or non-success status from the geocoding service.
    #[error("Geocoding request failed: {0}")]
    Unavailable(String),

    /// The service answered but had no usable match.
    #[error("No results were found for '{0}'.")]
    NoMatch(String),

    /// The service answered with something that is not a places response.
    #[error("Unexpected geocoding data format: {0}")]
    MalformedResponse(String),
}

/// Failure to fetch current conditions for a pair of coordinates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeatherError {
    /// Network error, timeout or non-success status from the weather service.
    #[error("Weather request failed: {0}")]
    Unavailable(String),

    /// The service answered but a required field was missing or had the wrong type.
    #[error("Unexpected weather data format: {0}")]
    MalformedResponse(String),
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
