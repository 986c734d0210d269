use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::color::ColorStrategyKind;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Google OAuth settings
    #[serde(default)]
    pub google: GoogleConfig,

    /// Calendar/tasks fetch settings
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
}

/// Google OAuth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Google OAuth Client ID
    /// Create at: https://console.cloud.google.com/apis/credentials
    pub client_id: String,
    /// Google OAuth Client Secret
    pub client_secret: String,
}

impl GoogleConfig {
    /// Check if credentials are configured (not placeholders)
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty()
            && !self.client_secret.is_empty()
            && !self.client_id.starts_with("YOUR_")
            && !self.client_secret.starts_with("YOUR_")
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: "YOUR_GOOGLE_CLIENT_ID".to_string(),
            client_secret: "YOUR_GOOGLE_CLIENT_SECRET".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Max in-flight per-calendar/per-list fetches (default: 8)
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// Color resolution strategy (default: snap)
    #[serde(default)]
    pub color_strategy: ColorStrategyKind,

    /// IANA timezone name used when creating timed events (default: UTC)
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

fn default_fetch_concurrency() -> usize {
    8
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            fetch_concurrency: default_fetch_concurrency(),
            color_strategy: ColorStrategyKind::default(),
            time_zone: default_time_zone(),
        }
    }
}

impl CalendarConfig {
    /// Parsed timezone, falling back to UTC for invalid names.
    pub fn tz(&self) -> chrono_tz::Tz {
        chrono_tz::Tz::from_str(&self.time_zone).unwrap_or(chrono_tz::Tz::UTC)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Dark mode enabled
    #[serde(default)]
    pub dark_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dayview");

        Self {
            config_dir,
            google: GoogleConfig::default(),
            calendar: CalendarConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.calendar.fetch_concurrency == 0 {
            result.add_error(
                "calendar.fetch_concurrency",
                "Fetch concurrency must be at least 1",
            );
        } else if self.calendar.fetch_concurrency > 64 {
            result.add_warning(
                "calendar.fetch_concurrency",
                "Fetch concurrency is unusually high (>64)",
            );
        }

        if chrono_tz::Tz::from_str(&self.calendar.time_zone).is_err() {
            result.add_error(
                "calendar.time_zone",
                format!("Unknown IANA timezone: {}", self.calendar.time_zone),
            );
        }

        if !self.google.is_configured() {
            result.add_warning(
                "google",
                "Google OAuth credentials are not configured; sign-in will not work",
            );
        }

        result
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("dayview");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        let validation = config.validate();
        assert!(validation.is_valid());
        // Placeholder credentials warn but don't fail.
        assert!(!validation.warnings.is_empty());
    }

    #[test]
    fn test_zero_concurrency_is_an_error() {
        let mut config = Config::default();
        config.calendar.fetch_concurrency = 0;
        let validation = config.validate();
        assert!(!validation.is_valid());
        assert!(validation.error_summary().contains("fetch_concurrency"));
    }

    #[test]
    fn test_unknown_timezone_is_an_error() {
        let mut config = Config::default();
        config.calendar.time_zone = "Mars/Olympus_Mons".to_string();
        assert!(!config.validate().is_valid());
        // tz() still degrades gracefully.
        assert_eq!(config.calendar.tz(), chrono_tz::Tz::UTC);
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.calendar.fetch_concurrency, 8);
        assert_eq!(parsed.calendar.color_strategy, ColorStrategyKind::Snap);
        assert_eq!(parsed.calendar.time_zone, "UTC");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: Config = toml::from_str(r#"config_dir = "/tmp/dayview""#).unwrap();
        assert_eq!(parsed.calendar.fetch_concurrency, 8);
        assert!(!parsed.ui.dark_mode);
        assert!(!parsed.google.is_configured());
    }
}
