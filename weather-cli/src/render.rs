use chrono::{DateTime, Local, Utc};
use std::io::{self, Write};
use weather_core::{Coordinates, WeatherSnapshot};

const NOT_AVAILABLE: &str = "N/A";

/// Print a snapshot as labeled lines.
pub fn write_report<W: Write>(
    out: &mut W,
    at: &Coordinates,
    weather: &WeatherSnapshot,
) -> io::Result<()> {
    writeln!(out, "📍Coordinates: {at}")?;
    writeln!(out, "🏙️City: {}, {}", weather.city, weather.country)?;
    writeln!(
        out,
        "🌡️Temperature: {}°C (feels like {}°C)",
        weather.temperature, weather.feels_like
    )?;
    writeln!(out, "🌈Min/Max: {}°C / {}°C", weather.temp_min, weather.temp_max)?;
    writeln!(
        out,
        "💧Humidity: {}% | Pressure: {} hPa",
        weather.humidity, weather.pressure
    )?;
    writeln!(
        out,
        "☁️Weather: {} - {}",
        weather.condition,
        capitalize(&weather.description)
    )?;
    writeln!(
        out,
        "🌬️Wind: {} m/s, Direction: {}",
        weather.wind_speed,
        with_unit(weather.wind_deg, "°")
    )?;
    writeln!(
        out,
        "☁️Clouds: {}% | Visibility: {}",
        weather.clouds,
        with_unit(weather.visibility, " m")
    )?;
    writeln!(
        out,
        "🌧️Rain (last 1h): {} | Snow (last 1h): {}",
        with_unit(weather.rain_1h, " mm"),
        with_unit(weather.snow_1h, " mm")
    )?;
    writeln!(out, "🌅Sunrise: {}", local_time(weather.sunrise_at()))?;
    writeln!(out, "🌇Sunset: {}", local_time(weather.sunset_at()))?;

    out.flush()
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `N/A` carries no unit.
fn with_unit(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v}{unit}"))
}

fn local_time(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: 21.5,
            feels_like: 21.2,
            temp_min: 19.9,
            temp_max: 23.1,
            pressure: 1017.0,
            humidity: 60.0,
            condition: "Clear".to_string(),
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
            wind_speed: 4.12,
            wind_deg: Some(320.0),
            clouds: 0.0,
            visibility: Some(10000.0),
            rain_1h: None,
            snow_1h: Some(0.3),
            sunrise: 1_719_985_000,
            sunset: i64::MAX,
            city: "Lisbon".to_string(),
            country: "PT".to_string(),
        }
    }

    fn render(at: &Coordinates, weather: &WeatherSnapshot) -> Vec<String> {
        let mut out = Vec::new();
        write_report(&mut out, at, weather).expect("write to Vec");
        String::from_utf8(out)
            .expect("utf-8")
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn report_has_one_line_per_group() {
        let lines = render(&Coordinates::from_degrees(38.72, -9.14), &snapshot());

        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "📍Coordinates: lat=38.72, lon=-9.14");
        assert_eq!(lines[1], "🏙️City: Lisbon, PT");
        assert_eq!(lines[2], "🌡️Temperature: 21.5°C (feels like 21.2°C)");
        assert_eq!(lines[3], "🌈Min/Max: 19.9°C / 23.1°C");
        assert_eq!(lines[4], "💧Humidity: 60% | Pressure: 1017 hPa");
        assert_eq!(lines[5], "☁️Weather: Clear - Clear sky");
        assert_eq!(lines[6], "🌬️Wind: 4.12 m/s, Direction: 320°");
        assert_eq!(lines[7], "☁️Clouds: 0% | Visibility: 10000 m");
        assert!(lines[9].starts_with("🌅Sunrise: 2024-07-0"));
    }

    #[test]
    fn unset_values_print_not_available() {
        let mut weather = snapshot();
        weather.wind_deg = None;
        weather.visibility = None;

        let lines = render(&Coordinates::from_raw("90", "0"), &weather);

        assert_eq!(lines[0], "📍Coordinates: lat=90, lon=0");
        assert_eq!(lines[6], "🌬️Wind: 4.12 m/s, Direction: N/A");
        assert_eq!(lines[7], "☁️Clouds: 0% | Visibility: N/A");
        assert_eq!(lines[8], "🌧️Rain (last 1h): N/A | Snow (last 1h): 0.3 mm");
        assert_eq!(lines[10], "🌇Sunset: N/A");
    }

    #[test]
    fn capitalize_matches_sentence_case() {
        assert_eq!(capitalize("light RAIN"), "Light rain");
        assert_eq!(capitalize("ébullition"), "Ébullition");
        assert_eq!(capitalize(""), "");
    }
}
