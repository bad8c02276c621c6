//! Configuration module for `uniport`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Portal endpoint configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Base URL of the university portal API
    #[serde(default)]
    pub base_url: String,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for report output files
    #[serde(default)]
    pub output_dir: String,
    /// Path of the cached auth token file
    #[serde(default)]
    pub token_cache: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Portal settings
    #[serde(default)]
    pub portal: PortalConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override portal base URL
    pub base_url: Option<String>,
    /// Override report output directory
    pub output_dir: Option<String>,
}

impl Config {
    /// Get the `$UNIPORT` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/uniport`
    /// - macOS: `~/Library/Application Support/uniport`
    /// - Windows: `%APPDATA%\uniport`
    #[must_use]
    pub fn get_uniport_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("uniport")
    }

    /// Get the user config file path (`config.toml` release, `dconfig.toml`
    /// debug)
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_uniport_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$UNIPORT` in a string to the actual config directory path
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains("$UNIPORT") {
            let uniport_dir = Self::get_uniport_dir();
            value.replace("$UNIPORT", uniport_dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string, expanding `$UNIPORT` variables
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the
    /// expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;
        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.output_dir = Self::expand_variables(&config.paths.output_dir);
        config.paths.token_cache = Self::expand_variables(&config.paths.token_cache);
        Ok(config)
    }

    /// Built-in defaults for the current build profile
    ///
    /// # Panics
    ///
    /// Panics if the embedded defaults file is not valid TOML, which is a
    /// build-time mistake caught by the config tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("embedded default config must parse")
    }

    /// Load the user config, falling back to defaults when no config file
    /// exists or it fails to parse. Missing fields are merged from the
    /// defaults.
    #[must_use]
    pub fn load() -> Self {
        let path = Self::get_config_file_path();
        let mut config = fs::read_to_string(&path)
            .ok()
            .and_then(|content| Self::from_toml(&content).ok())
            .unwrap_or_else(Self::from_defaults);
        config.merge_defaults(&Self::from_defaults());
        config
    }

    /// Merge missing fields from defaults into this config.
    ///
    /// Only fields that are empty in the current config and non-empty in
    /// defaults are updated. Returns `true` if any field changed.
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }
        if self.portal.base_url.is_empty() && !defaults.portal.base_url.is_empty() {
            self.portal.base_url.clone_from(&defaults.portal.base_url);
            changed = true;
        }
        if self.paths.output_dir.is_empty() && !defaults.paths.output_dir.is_empty() {
            self.paths.output_dir.clone_from(&defaults.paths.output_dir);
            changed = true;
        }
        if self.paths.token_cache.is_empty() && !defaults.paths.token_cache.is_empty() {
            self.paths.token_cache.clone_from(&defaults.paths.token_cache);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration.
    ///
    /// Only non-`None` values replace config values, and nothing is
    /// persisted; overrides apply to the current run only.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(base_url) = &overrides.base_url {
            self.portal.base_url.clone_from(base_url);
        }
        if let Some(output_dir) = &overrides.output_dir {
            self.paths.output_dir.clone_from(output_dir);
        }
    }

    /// Get a configuration value by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "base_url" => Some(self.portal.base_url.clone()),
            "output_dir" => Some(self.paths.output_dir.clone()),
            "token_cache" => Some(self.paths.token_cache.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// # Errors
    ///
    /// Returns an error message for unknown keys or non-boolean `verbose`
    /// values
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = Self::expand_variables(value),
            "verbose" => {
                self.logging.verbose = value
                    .parse()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "base_url" => self.portal.base_url = value.to_string(),
            "output_dir" => self.paths.output_dir = Self::expand_variables(value),
            "token_cache" => self.paths.token_cache = Self::expand_variables(value),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset a configuration value to its default
    ///
    /// # Errors
    ///
    /// Returns an error message for unknown keys
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        let default_value = defaults
            .get(key)
            .ok_or_else(|| format!("Unknown config key: '{key}'"))?;
        self.set(key, &default_value)
    }

    /// Persist this config to the user config file
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created, the
    /// config cannot be serialized, or the file cannot be written
    pub fn save(&self) -> Result<(), String> {
        let dir = Self::get_uniport_dir();
        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create {}: {e}", dir.display()))?;

        let toml_str =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        let path = Self::get_config_file_path();
        fs::write(&path, toml_str).map_err(|e| format!("Failed to write {}: {e}", path.display()))
    }

    /// Remove the user config file, restoring defaults on next load
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed
    pub fn reset() -> Result<(), String> {
        let path = Self::get_config_file_path();
        if path.exists() {
            fs::remove_file(&path).map_err(|e| format!("Failed to remove {}: {e}", path.display()))?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "level       = {}", self.logging.level)?;
        writeln!(f, "file        = {}", self.logging.file)?;
        writeln!(f, "verbose     = {}", self.logging.verbose)?;
        writeln!(f, "base_url    = {}", self.portal.base_url)?;
        writeln!(f, "output_dir  = {}", self.paths.output_dir)?;
        writeln!(f, "token_cache = {}", self.paths.token_cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse_and_cover_critical_fields() {
        let config = Config::from_defaults();
        assert!(!config.logging.level.is_empty());
        assert!(!config.portal.base_url.is_empty());
        assert!(!config.paths.output_dir.is_empty());
        assert!(!config.paths.token_cache.is_empty());
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut config = Config::from_defaults();
        config.set("level", "debug").unwrap();
        assert_eq!(config.get("level").as_deref(), Some("debug"));

        config.set("verbose", "true").unwrap();
        assert_eq!(config.get("verbose").as_deref(), Some("true"));

        assert!(config.set("verbose", "definitely").is_err());
        assert!(config.set("nonsense", "x").is_err());
        assert!(config.get("nonsense").is_none());
    }

    #[test]
    fn test_unset_restores_default() {
        let defaults = Config::from_defaults();
        let mut config = Config::from_defaults();
        config.set("base_url", "https://elsewhere.example").unwrap();
        config.unset("base_url", &defaults).unwrap();
        assert_eq!(config.portal.base_url, defaults.portal.base_url);
    }

    #[test]
    fn test_merge_defaults_fills_empty_fields_only() {
        let defaults = Config::from_defaults();
        let mut config = Config {
            logging: LoggingConfig {
                level: "error".to_string(),
                ..LoggingConfig::default()
            },
            ..Config::default()
        };

        assert!(config.merge_defaults(&defaults));
        assert_eq!(config.logging.level, "error");
        assert_eq!(config.portal.base_url, defaults.portal.base_url);
    }

    #[test]
    fn test_overrides_apply_only_set_values() {
        let mut config = Config::from_defaults();
        let original_url = config.portal.base_url.clone();
        config.apply_overrides(&ConfigOverrides {
            level: Some("debug".to_string()),
            verbose: Some(true),
            ..ConfigOverrides::default()
        });

        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.verbose);
        assert_eq!(config.portal.base_url, original_url);
    }
}
