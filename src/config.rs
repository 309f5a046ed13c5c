//! Configuration loading for plants.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.plants/config.toml`)
//! 3. Defaults (lowest priority)
//!
//! All configuration is optional. The tool runs with sensible defaults
//! when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{Clock, TimezonePolicy};
use crate::error::{PlantsError, Result};

/// Name of the plant created when none is given.
pub const DEFAULT_PLANT_NAME: &str = "New plant";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where the garden document lives.
    pub storage: StorageConfig,
    /// How "today" is determined.
    pub clock: ClockConfig,
    /// Overview and naming defaults.
    pub display: DisplayConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `garden.json`. Defaults to the plants home.
    pub data_dir: Option<PathBuf>,
}

/// Clock configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClockConfig {
    /// Timezone used for "today", both when recording and when measuring.
    pub timezone: TimezonePolicy,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Include hidden plants in overviews.
    pub show_hidden: bool,
    /// Name given to plants created without one.
    pub default_plant_name: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_hidden: false,
            default_plant_name: DEFAULT_PLANT_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration with the full precedence chain.
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `<plants_home>/config.toml`.
    ///
    /// A missing file is normal; an unreadable one is reported and ignored.
    fn load_user_config() -> Option<Config> {
        let path = config_path()?;
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring user config");
                None
            }
        }
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| PlantsError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| PlantsError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // PLANTS_TIMEZONE
        if let Ok(val) = env::var("PLANTS_TIMEZONE") {
            match val.parse::<TimezonePolicy>() {
                Ok(policy) => self.clock.timezone = policy,
                Err(_) => tracing::warn!(
                    "Invalid PLANTS_TIMEZONE value '{}'. Expected 'local' or 'utc'. Using '{}'.",
                    val,
                    self.clock.timezone
                ),
            }
        }

        // PLANTS_SHOW_HIDDEN
        if let Ok(val) = env::var("PLANTS_SHOW_HIDDEN") {
            match parse_bool(&val) {
                Some(b) => self.display.show_hidden = b,
                None => tracing::warn!(
                    "Invalid PLANTS_SHOW_HIDDEN value '{}'. Expected true/false. Using '{}'.",
                    val,
                    self.display.show_hidden
                ),
            }
        }

        // PLANTS_DATA_DIR
        if let Ok(val) = env::var("PLANTS_DATA_DIR") {
            if val.is_empty() {
                tracing::warn!("PLANTS_DATA_DIR is empty, ignoring");
            } else {
                self.storage.data_dir = Some(PathBuf::from(val));
            }
        }
    }

    /// Merge another config into this one, field by field.
    ///
    /// A field in `other` wins only when it differs from the default, so a
    /// layer can specify just the settings it cares about.
    fn merge(mut self, other: Config) -> Self {
        if other.storage.data_dir.is_some() {
            self.storage.data_dir = other.storage.data_dir;
        }

        if other.clock.timezone != TimezonePolicy::default() {
            self.clock.timezone = other.clock.timezone;
        }

        let default_display = DisplayConfig::default();
        if other.display.show_hidden != default_display.show_hidden {
            self.display.show_hidden = other.display.show_hidden;
        }
        if other.display.default_plant_name != default_display.default_plant_name
            && !other.display.default_plant_name.trim().is_empty()
        {
            self.display.default_plant_name = other.display.default_plant_name;
        }

        self
    }

    /// The clock described by this configuration.
    pub fn clock(&self) -> Clock {
        Clock::new(self.clock.timezone)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Get the plants home directory.
///
/// Returns `$PLANTS_HOME` if set and non-empty, otherwise `~/.plants`.
/// Relative `$PLANTS_HOME` values are canonicalized when they exist.
pub fn plants_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("PLANTS_HOME") {
        if home.is_empty() {
            tracing::warn!("PLANTS_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("PLANTS_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    dirs::home_dir().map(|home| home.join(".plants"))
}

/// Get the user config path.
///
/// Returns `<plants_home>/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    plants_home().map(|h| h.join("config.toml"))
}

/// Get the default data directory.
///
/// Returns `<plants_home>/`.
pub fn data_dir() -> Option<PathBuf> {
    plants_home()
}

/// Get the crash log path.
///
/// Returns `<plants_home>/crash.log`.
pub fn crash_log_path() -> Option<PathBuf> {
    plants_home().map(|h| h.join("crash.log"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV_VARS: &[&str] = &[
        "PLANTS_HOME",
        "PLANTS_TIMEZONE",
        "PLANTS_SHOW_HIDDEN",
        "PLANTS_DATA_DIR",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.data_dir, None);
        assert_eq!(config.clock.timezone, TimezonePolicy::Local);
        assert!(!config.display.show_hidden);
        assert_eq!(config.display.default_plant_name, "New plant");
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");

        let toml_content = r#"
[clock]
timezone = "utc"

[display]
show_hidden = true
"#;
        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();

        assert_eq!(config.clock.timezone, TimezonePolicy::Utc);
        assert!(config.display.show_hidden);
        // Unspecified fields keep their defaults
        assert_eq!(config.display.default_plant_name, "New plant");
        assert_eq!(config.storage.data_dir, None);
    }

    #[test]
    fn test_load_from_file_missing() {
        let result = Config::load_from_file(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(PlantsError::Storage { .. })));
    }

    #[test]
    fn test_load_from_file_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "this is not valid toml [[[").unwrap();

        let result = Config::load_from_file(&config_path);
        assert!(matches!(result, Err(PlantsError::Config { .. })));
    }

    #[test]
    fn test_load_from_file_unknown_timezone() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[clock]\ntimezone = \"mars\"\n").unwrap();

        assert!(Config::load_from_file(&config_path).is_err());
    }

    #[test]
    #[serial]
    fn test_user_config_is_applied() {
        clear_env();
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[display]\ndefault_plant_name = \"Seedling\"\n",
        )
        .unwrap();
        env::set_var("PLANTS_HOME", dir.path());

        let config = Config::load();
        assert_eq!(config.display.default_plant_name, "Seedling");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_user_config_falls_back_to_defaults() {
        clear_env();
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "[[[").unwrap();
        env::set_var("PLANTS_HOME", dir.path());

        assert_eq!(Config::load(), Config::default());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_var_precedence() {
        clear_env();
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "[clock]\ntimezone = \"utc\"\n").unwrap();
        env::set_var("PLANTS_HOME", dir.path());
        env::set_var("PLANTS_TIMEZONE", "local");
        env::set_var("PLANTS_SHOW_HIDDEN", "yes");
        env::set_var("PLANTS_DATA_DIR", "/srv/plants");

        let config = Config::load();

        assert_eq!(config.clock.timezone, TimezonePolicy::Local);
        assert!(config.display.show_hidden);
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/srv/plants")));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_var_invalid_values_ignored() {
        clear_env();
        let dir = TempDir::new().unwrap();
        env::set_var("PLANTS_HOME", dir.path());
        env::set_var("PLANTS_TIMEZONE", "mars");
        env::set_var("PLANTS_SHOW_HIDDEN", "sometimes");
        env::set_var("PLANTS_DATA_DIR", "");

        let config = Config::load();

        assert_eq!(config, Config::default());

        clear_env();
    }

    #[test]
    fn test_merge_field_by_field() {
        let base = Config {
            storage: StorageConfig {
                data_dir: Some(PathBuf::from("/data")),
            },
            ..Default::default()
        };
        let other = Config {
            clock: ClockConfig {
                timezone: TimezonePolicy::Utc,
            },
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.storage.data_dir, Some(PathBuf::from("/data")));
        assert_eq!(merged.clock.timezone, TimezonePolicy::Utc);
    }

    #[test]
    fn test_merge_ignores_blank_plant_name() {
        let mut other = Config::default();
        other.display.default_plant_name = "   ".to_string();

        let merged = Config::default().merge(other);
        assert_eq!(merged.display.default_plant_name, DEFAULT_PLANT_NAME);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_full_toml_roundtrip() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/var/lib/plants"));
        config.clock.timezone = TimezonePolicy::Utc;
        config.display.show_hidden = true;

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    #[serial]
    fn test_plants_home_with_env() {
        clear_env();
        env::set_var("PLANTS_HOME", "/custom/plants");
        assert_eq!(plants_home(), Some(PathBuf::from("/custom/plants")));
        assert_eq!(
            config_path(),
            Some(PathBuf::from("/custom/plants/config.toml"))
        );
        assert_eq!(data_dir(), Some(PathBuf::from("/custom/plants")));
        assert_eq!(
            crash_log_path(),
            Some(PathBuf::from("/custom/plants/crash.log"))
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_plants_home_empty_env() {
        clear_env();
        env::set_var("PLANTS_HOME", "");
        let home = plants_home();
        if let Some(user_home) = dirs::home_dir() {
            assert_eq!(home, Some(user_home.join(".plants")));
        }
        clear_env();
    }
}
