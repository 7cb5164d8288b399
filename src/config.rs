//! Application configuration loaded from a TOML file.
//!
//! Lives at `<platform config dir>/gesturenav/config.toml`, overridable via
//! the `GESTURENAV_CONFIG` environment variable. A default file is written
//! on first run; a file that fails to load logs a warning and falls back to
//! defaults so the application always comes up.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::mapping::gesture::GESTURE_DEBOUNCE_MS;
use crate::nav::NavModel;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No config directory available on this platform")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tracker: TrackerSection,
    pub mapping: MappingSection,
    pub ui: UiSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerSection::default(),
            mapping: MappingSection::default(),
            ui: UiSection::default(),
        }
    }
}

/// `[tracker]` section: where the gesture service lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSection {
    pub server_url: String,
}

impl Default for TrackerSection {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:5050/events".to_string(),
        }
    }
}

/// `[mapping]` section: gesture acceptance timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingSection {
    pub debounce_ms: u64,
}

impl Default for MappingSection {
    fn default() -> Self {
        Self {
            debounce_ms: GESTURE_DEBOUNCE_MS,
        }
    }
}

/// `[ui]` section: button row and simulated navigation timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSection {
    pub navigation_delay_ms: u64,
    pub buttons: Vec<String>,
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            navigation_delay_ms: 1000,
            buttons: NavModel::default_labels(),
        }
    }
}

/// Resolves the config file path, honoring `GESTURENAV_CONFIG`.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var("GESTURENAV_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("gesturenav").join("config.toml"))
}

/// Writes the default config file if none exists yet.
pub fn ensure_default_config() -> Result<(), ConfigError> {
    let path = config_path()?;
    if path.exists() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let rendered = toml::to_string_pretty(&AppConfig::default())?;
    fs::write(&path, rendered)?;
    info!("Wrote default configuration to {}", path.display());
    Ok(())
}

/// Loads the config file, falling back to defaults on any failure.
pub fn load_or_default() -> AppConfig {
    let path = match config_path() {
        Ok(path) => path,
        Err(e) => {
            warn!("Config path unavailable ({}), using defaults", e);
            return AppConfig::default();
        }
    };

    match fs::read_to_string(&path) {
        Ok(raw) => match toml::from_str(&raw) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Invalid config at {} ({}), using defaults", path.display(), e);
                AppConfig::default()
            }
        },
        Err(e) => {
            warn!(
                "Could not read config at {} ({}), using defaults",
                path.display(),
                e
            );
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = AppConfig::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: AppConfig = toml::from_str("[tracker]\nserver_url = \"ws://host:1/ws\"\n").unwrap();
        assert_eq!(parsed.tracker.server_url, "ws://host:1/ws");
        assert_eq!(parsed.mapping.debounce_ms, GESTURE_DEBOUNCE_MS);
        assert_eq!(parsed.ui.navigation_delay_ms, 1000);
    }

    #[test]
    fn defaults_use_the_documented_timings() {
        let config = AppConfig::default();
        assert_eq!(config.mapping.debounce_ms, 300);
        assert_eq!(config.ui.navigation_delay_ms, 1000);
        assert!(!config.ui.buttons.is_empty());
    }
}
