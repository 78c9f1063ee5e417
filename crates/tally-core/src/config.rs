//! Application configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Override file: `TALLY_CONFIG`, or `~/.local/share/tally/config.toml`
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override file keep their default values.
//! `TALLY_DB` and `TALLY_REPORT_DIR` then override the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::TimePeriod;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/tally.toml");

pub const CONFIG_ENV: &str = "TALLY_CONFIG";
pub const DB_ENV: &str = "TALLY_DB";
pub const REPORT_DIR_ENV: &str = "TALLY_REPORT_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub report_dir: PathBuf,
    pub default_period: TimePeriod,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("tally.db"),
            report_dir: PathBuf::from("."),
            default_period: TimePeriod::Daily,
        }
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    database_path: Option<PathBuf>,
    report_dir: Option<PathBuf>,
    default_period: Option<String>,
}

impl RawConfig {
    fn apply_to(self, config: &mut Config) -> Result<()> {
        if let Some(path) = self.database_path {
            config.database_path = path;
        }
        if let Some(dir) = self.report_dir {
            config.report_dir = dir;
        }
        if let Some(period) = self.default_period {
            config.default_period = period
                .parse()
                .map_err(|e: String| Error::Config(format!("default_period: {}", e)))?;
        }
        Ok(())
    }
}

/// Default override location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config.toml"))
}

impl Config {
    /// Load config from the environment's override file (if any) and env vars
    pub fn load() -> Result<Self> {
        let override_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = Self::load_from(override_path.as_deref())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load config from an explicit override path, falling back to defaults
    pub fn load_from(override_path: Option<&Path>) -> Result<Self> {
        let path = override_path
            .map(Path::to_path_buf)
            .or_else(default_config_path)
            .filter(|p| p.exists());

        let mut config = Self::parse(DEFAULT_CONFIG)?;
        if let Some(path) = path {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config {}: {}", path.display(), e))
            })?;
            let raw: RawConfig = toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config {}: {}", path.display(), e))
            })?;
            raw.apply_to(&mut config)?;
            debug!(path = %path.display(), "Loaded config override");
        }
        Ok(config)
    }

    /// Parse a complete TOML document on top of built-in defaults
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        let mut config = Self::default();
        raw.apply_to(&mut config)?;
        Ok(config)
    }

    /// Apply `TALLY_DB` / `TALLY_REPORT_DIR` overrides from `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(DB_ENV).filter(|v| !v.is_empty()) {
            self.database_path = PathBuf::from(db);
        }
        if let Some(dir) = lookup(REPORT_DIR_ENV).filter(|v| !v.is_empty()) {
            self.report_dir = PathBuf::from(dir);
        }
    }
}
