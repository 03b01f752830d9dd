use crate::defaults;
use crate::error::{ParloError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub audio: AudioConfig,
    pub output: OutputConfig,
}

/// Inference backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub user_name: Option<String>,
    pub timeout_secs: u64,
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub device: Option<String>,
    pub max_duration_secs: Option<u64>,
}

/// Local output file configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub recording_path: String,
    pub corrected_path: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            user_name: None,
            timeout_secs: defaults::TIMEOUT_SECS,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            max_duration_secs: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            recording_path: defaults::RECORDING_FILENAME.to_string(),
            corrected_path: defaults::CORRECTED_FILENAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    // Re-panic on invalid TOML or other errors
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - PARLO_BACKEND_URL → backend.base_url
    /// - PARLO_USER_NAME → backend.user_name
    /// - PARLO_AUDIO_DEVICE → audio.device
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("PARLO_BACKEND_URL")
            && !url.is_empty()
        {
            self.backend.base_url = url;
        }

        if let Ok(name) = std::env::var("PARLO_USER_NAME")
            && !name.is_empty()
        {
            self.backend.user_name = Some(name);
        }

        if let Ok(device) = std::env::var("PARLO_AUDIO_DEVICE")
            && !device.is_empty()
        {
            self.audio.device = Some(device);
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/parlo/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("parlo")
            .join("config.toml")
    }

    /// Look up a configuration value by dotted key path (e.g. "backend.base_url").
    pub fn get_value_by_path(&self, key: &str) -> Result<String> {
        match key {
            "backend.base_url" => Ok(self.backend.base_url.clone()),
            "backend.user_name" => Ok(self.backend.user_name.clone().unwrap_or_default()),
            "backend.timeout_secs" => Ok(self.backend.timeout_secs.to_string()),
            "audio.device" => Ok(self.audio.device.clone().unwrap_or_default()),
            "audio.max_duration_secs" => Ok(self
                .audio
                .max_duration_secs
                .map(|s| s.to_string())
                .unwrap_or_default()),
            "output.recording_path" => Ok(self.output.recording_path.clone()),
            "output.corrected_path" => Ok(self.output.corrected_path.clone()),
            _ => Err(ParloError::ConfigInvalidValue {
                key: key.to_string(),
                message: "unknown key".to_string(),
            }),
        }
    }

    /// Set a configuration value by dotted key path and persist the file.
    pub fn set_value_by_path(path: &Path, key: &str, value: &str) -> Result<()> {
        let mut config = Self::load_or_default(path);

        match key {
            "backend.base_url" => config.backend.base_url = value.to_string(),
            "backend.user_name" => {
                config.backend.user_name = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "backend.timeout_secs" => {
                config.backend.timeout_secs =
                    value.parse().map_err(|_| ParloError::ConfigInvalidValue {
                        key: key.to_string(),
                        message: format!("expected a number of seconds, got '{value}'"),
                    })?;
            }
            "audio.device" => {
                config.audio.device = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "audio.max_duration_secs" => {
                config.audio.max_duration_secs = if value.is_empty() {
                    None
                } else {
                    Some(value.parse().map_err(|_| ParloError::ConfigInvalidValue {
                        key: key.to_string(),
                        message: format!("expected a number of seconds, got '{value}'"),
                    })?)
                };
            }
            "output.recording_path" => config.output.recording_path = value.to_string(),
            "output.corrected_path" => config.output.corrected_path = value.to_string(),
            _ => {
                return Err(ParloError::ConfigInvalidValue {
                    key: key.to_string(),
                    message: "unknown key".to_string(),
                });
            }
        }

        config.save(path)
    }

    /// Serialize the configuration and write it to disk, creating parent
    /// directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self).map_err(|e| ParloError::ConfigParse {
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// Render the effective configuration as TOML for `parlo config list`.
    pub fn to_display_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ParloError::ConfigParse {
            message: e.to_string(),
        })
    }
}
