//! Client configuration
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/matricula/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::crud::StatusTimeouts;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod logging;
mod serialization;


pub use logging::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const ENV_API_URL: &str = "MATRICULA_API_URL";
const ENV_THEME: &str = "MATRICULA_THEME";

// ─────────────────────────────────────────────────────────────────────────────
// Theme
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

impl ThemeChoice {
    /// Parse theme name; unknown values fall back to dark
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "light" => Self::Light,
            _ => Self::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Status banners
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusConfig {
    /// How long success banners stay up
    pub success_timeout_ms: u64,
    /// 0 keeps errors until the next user action
    pub error_timeout_ms: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            success_timeout_ms: 3000,
            error_timeout_ms: 0,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileStatus {
    pub success_timeout_ms: Option<u64>,
    pub error_timeout_ms: Option<u64>,
}

impl StatusConfig {
    pub fn from_file(file: Option<FileStatus>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();
        Self {
            success_timeout_ms: file.success_timeout_ms.unwrap_or(defaults.success_timeout_ms),
            error_timeout_ms: file.error_timeout_ms.unwrap_or(defaults.error_timeout_ms),
        }
    }

    pub fn timeouts(&self) -> StatusTimeouts {
        StatusTimeouts {
            success: Duration::from_millis(self.success_timeout_ms),
            error: (self.error_timeout_ms > 0).then(|| Duration::from_millis(self.error_timeout_ms)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the enrollment backend
    pub api_url: String,

    /// Color scheme for the TUI
    pub theme: ThemeChoice,

    /// Banner timeouts
    pub status: StatusConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            theme: ThemeChoice::default(),
            status: StatusConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure; every key optional
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub api_url: Option<String>,
    pub theme: Option<String>,

    /// Optional [status] section
    pub status: Option<FileStatus>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/matricula/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("matricula").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        // Write config (ignore errors - config is optional)
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Read the config file. A missing file is not an error; a broken one is.
    fn load_file_config(path: &Path) -> Result<FileConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).with_context(|| {
                format!(
                    "Failed to parse {} (check quoting, true/false values and section names)",
                    path.display()
                )
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read config file {}", path.display()))
            }
        }
    }

    /// Load configuration: env > file > defaults
    pub fn from_env() -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) => Self::load_file_config(&path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(file, |key| std::env::var(key).ok()))
    }

    /// Merge file values with an environment lookup
    pub(crate) fn merge(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        // API URL: env > file > default
        let api_url = env(ENV_API_URL)
            .filter(|v| !v.trim().is_empty())
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        // Theme: env > file > default
        let theme = env(ENV_THEME)
            .or(file.theme)
            .map(|s| ThemeChoice::parse(&s))
            .unwrap_or_default();

        Self {
            api_url,
            theme,
            status: StatusConfig::from_file(file.status),
            logging: LoggingConfig::from_file(file.logging),
        }
    }
}
