use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_COUNTRY: &str = "BR";
pub const DEFAULT_LANGUAGE: &str = "pt_br";
pub const DEFAULT_GEOCODING_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_ICON_URL_TEMPLATE: &str = "https://openweathermap.org/img/wn/{icon}@4x.png";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_country = "BR"
/// language = "pt_br"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather credential.
    pub api_key: Option<String>,

    /// Country code appended on the fallback geocode lookup.
    pub default_country: String,

    /// `lang` parameter for the weather endpoint.
    pub language: String,

    pub geocoding_url: String,
    pub weather_url: String,

    /// Icon image URL with an `{icon}` placeholder.
    pub icon_url_template: String,

    /// Per-request timeout. Unset means requests may block indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            default_country: DEFAULT_COUNTRY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            icon_url_template: DEFAULT_ICON_URL_TEMPLATE.to_string(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "city-weather", "city-weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// API key from the environment, falling back to the stored one.
    pub fn api_key(&self) -> Result<String> {
        self.api_key_with_override(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_with_override(&self, env_value: Option<String>) -> Result<String> {
        env_value
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `city-weather configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_openweather() {
        let cfg = Config::default();

        assert_eq!(cfg.default_country, "BR");
        assert_eq!(cfg.language, "pt_br");
        assert!(cfg.geocoding_url.ends_with("/geo/1.0/direct"));
        assert!(cfg.timeout().is_none());
    }

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key_with_override(None).unwrap_err();

        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[test]
    fn env_key_overrides_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        assert_eq!(cfg.api_key_with_override(None).unwrap(), "FILE_KEY");
        assert_eq!(cfg.api_key_with_override(Some("ENV_KEY".into())).unwrap(), "ENV_KEY");
        assert_eq!(cfg.api_key_with_override(Some("  ".into())).unwrap(), "FILE_KEY");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml("api_key = \"KEY\"\ntimeout_secs = 10\n").unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.default_country, "BR");
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn toml_roundtrip_preserves_fields() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.default_country = "PT".into();

        let text = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }
}
