//! Runtime configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::delegate::{StatusBarBehavior, WindowLevel};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML could not be parsed
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A duration field is negative or not a number
    #[error("invalid duration for {field}: {value}")]
    InvalidDuration { field: &'static str, value: f64 },
}

/// Presenter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Present without checking host presentability (test harnesses)
    pub headless_mode: bool,

    /// Allow animated reveals when the message and platform support them
    pub animate_reveal: bool,

    /// Stack a message instead of dropping it when another is displayed
    pub stack_when_busy: bool,

    /// Window level every presentation context starts from
    pub default_window_level: WindowLevel,

    /// Status bar behavior every presentation context starts from
    pub status_bar: StatusBarBehavior,

    /// Upper bound on auto-dismiss durations in seconds (0 = unlimited)
    pub max_auto_dismiss_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            headless_mode: false,
            animate_reveal: true,
            stack_when_busy: true,
            default_window_level: WindowLevel::above_normal(),
            status_bar: StatusBarBehavior::Inherit,
            max_auto_dismiss_secs: 0.0,
        }
    }
}

impl Config {
    /// Headless defaults, for tests and scripted runs.
    pub fn headless() -> Self {
        Self {
            headless_mode: true,
            ..Self::default()
        }
    }

    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("msgstack/config.toml")),
            Some(std::path::PathBuf::from("/etc/msgstack/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(content) => match Self::from_toml_str(&content) {
                    Ok(config) => {
                        tracing::info!(?path, headless = config.headless_mode, "loaded configuration");
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!(?path, error = %e, "failed to parse config");
                    }
                },
                Err(e) => {
                    tracing::warn!(?path, error = %e, "failed to read config");
                }
            }
        }

        tracing::info!("using default configuration");
        Self::default()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the presenter cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secs = self.max_auto_dismiss_secs;
        if !secs.is_finite() || secs < 0.0 {
            return Err(ConfigError::InvalidDuration {
                field: "max_auto_dismiss_secs",
                value: secs,
            });
        }
        Ok(())
    }

    /// Apply the auto-dismiss cap to a requested duration.
    pub fn clamp_auto_dismiss(&self, requested: Duration) -> Duration {
        if self.max_auto_dismiss_secs <= 0.0 {
            return requested;
        }
        // Non-finite or out of range caps nothing
        match Duration::try_from_secs_f64(self.max_auto_dismiss_secs) {
            Ok(cap) => requested.min(cap),
            Err(_) => requested,
        }
    }
}

/// Helper for getting XDG directories
mod dirs {
    use std::path::PathBuf;

    pub fn config_dir() -> Option<PathBuf> {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
    }
}
