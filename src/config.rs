//! Configuration
//!
//! Loads the dashboard configuration from a TOML file, with environment
//! variable overrides. Every field has a default, so an absent or partial
//! file is fine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub window: WindowConfig,
}

/// Dataset location and initial toggles
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Initial state of the "show data" toggle.
    #[serde(default)]
    pub show_data: bool,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("gapminder_tidy.csv")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            show_data: false,
        }
    }
}

/// Native window size
#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: f32,

    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    1200.0
}

fn default_height() -> f32 {
    800.0
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from the first default location that exists, or use defaults.
    pub fn load_default() -> Result<Self> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("gapminder-dashboard").join("config.toml")),
            Some(PathBuf::from("./dashboard.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                log::info!("Loading config from {}", path.display());
                return Self::load(path);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Apply `GAPMINDER_DATA` and `GAPMINDER_SHOW_DATA` overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("GAPMINDER_DATA") {
            self.data.path = PathBuf::from(path);
        }
        if let Some(show) = var("GAPMINDER_SHOW_DATA") {
            match show.parse() {
                Ok(flag) => self.data.show_data = flag,
                Err(_) => log::warn!("Ignoring GAPMINDER_SHOW_DATA={show}: expected true or false"),
            }
        }
    }
}
