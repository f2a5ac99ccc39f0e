use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_GEOCODING_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Environment variables holding the geocoding token, newest name first.
const GEO_TOKEN_VARS: &[&str] = &["GEO_TOKEN", "GEO_KEY"];
/// Environment variables holding the weather API key, newest name first.
const WEATHER_KEY_VARS: &[&str] = &["WEATHER_KEY", "API_KEY"];

/// Settings for the geocoding service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    pub token: Option<String>,
    pub url: String,
    /// Number of candidates requested; only the first one is used.
    pub limit: u8,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            token: None,
            url: DEFAULT_GEOCODING_URL.to_string(),
            limit: 1,
        }
    }
}

/// Settings for the weather service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherServiceConfig {
    pub api_key: Option<String>,
    pub url: String,
}

impl Default for WeatherServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            url: DEFAULT_WEATHER_URL.to_string(),
        }
    }
}

/// Everything one run needs to talk to both services.
///
/// Example TOML:
/// ```toml
/// timeout_secs = 10
///
/// [geocoding]
/// token = "pk...."
///
/// [weather]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geocoding: GeocodingConfig,
    pub weather: WeatherServiceConfig,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoding: GeocodingConfig::default(),
            weather: WeatherServiceConfig::default(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Build the run configuration: defaults, then the config file (if any),
    /// then `./.env`, then the process environment.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path, Path::new(".env"), |name| std::env::var(name).ok())
    }

    /// Layer `config_file` (skipped when absent) and `dotenv` over the defaults,
    /// then apply overrides from `lookup`.
    pub fn load_from<F>(config_file: &Path, dotenv: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = if config_file.exists() {
            Self::from_file(config_file)?
        } else {
            Self::default()
        };

        load_dotenv(dotenv)?;
        cfg.apply_env(lookup);

        Ok(cfg)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override settings from environment-style variables. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_set = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(*name))
                .find(|value| !value.trim().is_empty())
        };

        if let Some(token) = first_set(GEO_TOKEN_VARS) {
            self.geocoding.token = Some(token);
        }
        if let Some(key) = first_set(WEATHER_KEY_VARS) {
            self.weather.api_key = Some(key);
        }
        if let Some(url) = first_set(&["GEO_URL"]) {
            self.geocoding.url = url;
        }
        if let Some(url) = first_set(&["WEATHER_URL"]) {
            self.weather.url = url;
        }
    }

    pub fn geocoding_token(&self) -> Result<&str> {
        self.geocoding.token.as_deref().ok_or_else(|| {
            anyhow!(
                "No geocoding token configured.\n\
                 Hint: set GEO_TOKEN in the environment or in ./.env."
            )
        })
    }

    pub fn weather_api_key(&self) -> Result<&str> {
        self.weather.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No weather API key configured.\n\
                 Hint: set WEATHER_KEY in the environment or in ./.env."
            )
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Load `KEY=VALUE` pairs from `path` into the process environment without
/// overriding variables that are already set. A missing file is not an error.
fn load_dotenv(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Loaded environment file");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to load environment file: {}", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_point_at_public_services() {
        let cfg = Config::default();

        assert_eq!(cfg.geocoding.url, DEFAULT_GEOCODING_URL);
        assert_eq!(cfg.geocoding.limit, 1);
        assert_eq!(cfg.weather.url, DEFAULT_WEATHER_URL);
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn missing_credentials_error_with_hint() {
        let cfg = Config::default();

        let err = cfg.geocoding_token().unwrap_err();
        assert!(err.to_string().contains("GEO_TOKEN"));

        let err = cfg.weather_api_key().unwrap_err();
        assert!(err.to_string().contains("WEATHER_KEY"));
    }

    #[test]
    fn env_overrides_credentials_and_urls() {
        let vars = env(&[
            ("GEO_TOKEN", "geo"),
            ("WEATHER_KEY", "wx"),
            ("GEO_URL", "http://localhost:1/places"),
            ("WEATHER_URL", "http://localhost:2/weather"),
        ]);
        let mut cfg = Config::default();
        cfg.apply_env(|name| vars.get(name).cloned());

        assert_eq!(cfg.geocoding_token().unwrap(), "geo");
        assert_eq!(cfg.weather_api_key().unwrap(), "wx");
        assert_eq!(cfg.geocoding.url, "http://localhost:1/places");
        assert_eq!(cfg.weather.url, "http://localhost:2/weather");
    }

    #[test]
    fn legacy_variable_names_are_accepted() {
        let vars = env(&[("GEO_KEY", "old-geo"), ("API_KEY", "old-wx")]);
        let mut cfg = Config::default();
        cfg.apply_env(|name| vars.get(name).cloned());

        assert_eq!(cfg.geocoding_token().unwrap(), "old-geo");
        assert_eq!(cfg.weather_api_key().unwrap(), "old-wx");
    }

    #[test]
    fn newer_name_wins_and_empty_values_are_ignored() {
        let vars = env(&[
            ("GEO_TOKEN", "  "),
            ("GEO_KEY", "old-geo"),
            ("WEATHER_KEY", "new"),
            ("API_KEY", "old"),
        ]);
        let mut cfg = Config::default();
        cfg.apply_env(|name| vars.get(name).cloned());

        assert_eq!(cfg.geocoding_token().unwrap(), "old-geo");
        assert_eq!(cfg.weather_api_key().unwrap(), "new");
    }

    #[test]
    fn toml_file_fills_in_missing_sections_with_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            timeout_secs = 5

            [weather]
            api_key = "from-file"
            "#,
        )
        .expect("valid toml");

        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.weather.api_key.as_deref(), Some("from-file"));
        assert_eq!(cfg.weather.url, DEFAULT_WEATHER_URL);
        assert_eq!(cfg.geocoding.url, DEFAULT_GEOCODING_URL);
        assert!(cfg.geocoding.token.is_none());
    }

    #[test]
    fn missing_dotenv_file_is_ignored() {
        assert!(load_dotenv(Path::new("definitely/not/here/.env")).is_ok());
    }

    #[test]
    fn from_file_reads_config_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "timeout_secs = 7\n\n[geocoding]\ntoken = \"geo-file\"\nlimit = 3\n",
        )
        .expect("write config");

        let cfg = Config::from_file(&path).expect("config");

        assert_eq!(cfg.timeout_secs, 7);
        assert_eq!(cfg.geocoding.token.as_deref(), Some("geo-file"));
        assert_eq!(cfg.geocoding.limit, 3);
        assert!(cfg.weather.api_key.is_none());
    }

    #[test]
    fn from_file_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"\n").expect("write config");

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn dotenv_fills_unset_variables_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "WXCFG_DOTENV_ONLY=from-dotenv\nWXCFG_DOTENV_PRESET=from-dotenv\n",
        )
        .expect("write .env");

        // SAFETY: this variable name is used by this test alone.
        unsafe { std::env::set_var("WXCFG_DOTENV_PRESET", "from-env") };

        load_dotenv(&path).expect("load .env");

        assert_eq!(std::env::var("WXCFG_DOTENV_ONLY").as_deref(), Ok("from-dotenv"));
        assert_eq!(std::env::var("WXCFG_DOTENV_PRESET").as_deref(), Ok("from-env"));
    }

    #[test]
    fn load_from_layers_file_then_dotenv_then_env() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[geocoding]\ntoken = \"geo-file\"\n\n[weather]\napi_key = \"wx-file\"\n",
        )
        .expect("write config");
        let dotenv_path = dir.path().join(".env");
        fs::write(
            &dotenv_path,
            "WXCFG_LAYERS_WEATHER_KEY=wx-dotenv\nWXCFG_LAYERS_GEO_URL=http://localhost:9/places\n",
        )
        .expect("write .env");

        // SAFETY: the WXCFG_LAYERS_ prefix is used by this test alone.
        unsafe { std::env::set_var("WXCFG_LAYERS_GEO_URL", "http://localhost:7/places") };

        let cfg = Config::load_from(&config_path, &dotenv_path, |name| {
            std::env::var(format!("WXCFG_LAYERS_{name}")).ok()
        })
        .expect("config");

        assert_eq!(cfg.geocoding_token().unwrap(), "geo-file");
        assert_eq!(cfg.weather_api_key().unwrap(), "wx-dotenv");
        assert_eq!(cfg.geocoding.url, "http://localhost:7/places");
        assert_eq!(cfg.weather.url, DEFAULT_WEATHER_URL);
    }

    #[test]
    fn load_from_without_config_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");

        let cfg = Config::load_from(
            &dir.path().join("config.toml"),
            &dir.path().join(".env"),
            |_| None,
        )
        .expect("config");

        assert!(cfg.geocoding.token.is_none());
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn unit_and_language_keys_in_file_are_ignored() {
        let cfg: Config = toml::from_str(
            r#"
            [weather]
            units = "imperial"
            lang = "pt"
            "#,
        )
        .expect("unknown keys are skipped");

        assert_eq!(cfg.weather.url, DEFAULT_WEATHER_URL);
    }
}
