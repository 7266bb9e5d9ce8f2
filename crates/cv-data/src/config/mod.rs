//! Profiler configuration

use serde::{Serialize, Deserialize};

use crate::DataError;

/// Size of the leading chunk that is analyzed (50 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 50 * 1024;

/// Limits applied while sampling an upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Bytes read from the start of the file
    pub chunk_size: usize,

    /// Leading data rows that must all parse as numbers for a numeric column
    pub type_probe_rows: usize,

    /// Data rows considered when counting distinct values
    pub unique_probe_rows: usize,

    /// Data rows kept in the summary
    pub max_rows: usize,

    /// Example values kept per column
    pub max_sample_values: usize,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            type_probe_rows: 5,
            unique_probe_rows: 100,
            max_rows: 100,
            max_sample_values: 3,
        }
    }
}

impl ProfilerConfig {
    /// Parse a (possibly partial) JSON configuration
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject limits the profiler cannot work with
    pub fn validate(&self) -> Result<(), DataError> {
        if self.chunk_size == 0 {
            return Err(DataError::Config("chunk_size must be positive".to_string()));
        }
        if self.type_probe_rows == 0 {
            return Err(DataError::Config("type_probe_rows must be positive".to_string()));
        }
        Ok(())
    }
}
