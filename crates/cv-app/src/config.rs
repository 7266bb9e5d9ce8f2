//! Application configuration file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use cv_data::ProfilerConfig;
use cv_views::ChartConfig;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "CHARTSKETCH_CONFIG";

/// Looked up in the working directory when the variable is unset
pub const DEFAULT_CONFIG_FILE: &str = "chartsketch.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub profiler: ProfilerConfig,
    pub chart: ChartConfig,
}

impl AppConfig {
    /// Load from `$CHARTSKETCH_CONFIG`, then `./chartsketch.json`, else defaults
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::load_from(explicit.as_deref(), Path::new(DEFAULT_CONFIG_FILE))
    }

    /// An explicit path must exist; the fallback path is optional
    pub fn load_from(explicit: Option<&Path>, fallback: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => path,
            None if fallback.exists() => fallback,
            None => return Ok(Self::default()),
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config
            .profiler
            .validate()
            .with_context(|| format!("Invalid profiler settings in {}", path.display()))?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
