//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use battview_core::WindowPolicy;
use battview_core::window::{DEFAULT_MIN_SIZE, DEFAULT_ZOOM_STEP};
use battview_types::DEFAULT_WINDOW_SIZE;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "BATTVIEW_CONFIG";

/// Default step for the large zoom key in the dashboard.
pub const DEFAULT_LARGE_ZOOM_STEP: usize = 30;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default record source (file path)
    #[serde(default)]
    pub source: Option<String>,

    /// Default output format
    #[serde(default)]
    pub format: Option<String>,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Default visual style
    #[serde(default)]
    pub style: Option<String>,

    /// Scroll and zoom settings
    #[serde(default)]
    pub window: WindowConfig,
}

/// Scroll and zoom settings shared by `view` and the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Smallest window size.
    #[serde(default = "default_min_size")]
    pub min_size: usize,

    /// Records added or removed per zoom step.
    #[serde(default = "default_zoom_step")]
    pub zoom_step: usize,

    /// Records added per large zoom step (dashboard `Z`).
    #[serde(default = "default_large_zoom_step")]
    pub large_zoom_step: usize,

    /// Window size when none is requested.
    #[serde(default = "default_size")]
    pub default_size: usize,
}

fn default_min_size() -> usize {
    DEFAULT_MIN_SIZE
}

fn default_zoom_step() -> usize {
    DEFAULT_ZOOM_STEP
}

fn default_large_zoom_step() -> usize {
    DEFAULT_LARGE_ZOOM_STEP
}

fn default_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            min_size: default_min_size(),
            zoom_step: default_zoom_step(),
            large_zoom_step: default_large_zoom_step(),
            default_size: default_size(),
        }
    }
}

impl WindowConfig {
    /// Validated window policy for the pipeline.
    pub fn policy(&self) -> Result<WindowPolicy> {
        WindowPolicy::new(self.min_size, self.zoom_step).context("Invalid [window] configuration")
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("battview")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from a specific file, falling back to defaults with a
    /// warning when it cannot be read or parsed.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => {
                    warn!("Failed to parse config {}: {}", path.display(), e);
                }
            },
            Err(e) => {
                warn!("Failed to read config {}: {}", path.display(), e);
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    /// Save config to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Resolve the record source from the argument, falling back to config.
pub fn resolve_source(source: Option<String>, config: &Config) -> Option<String> {
    source.or_else(|| config.source.clone())
}

/// Resolve the window size: explicit value, then config, then default.
pub fn resolve_size(size: Option<i64>, config: &Config) -> i64 {
    size.unwrap_or_else(|| i64::try_from(config.window.default_size).unwrap_or(i64::MAX))
}
