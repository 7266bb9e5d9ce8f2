//! Sampling and profiling of uploaded CSV files

pub mod config;
pub mod profiler;
pub mod sources;

use thiserror::Error;

// Re-exports
pub use config::ProfilerConfig;
pub use profiler::{parse_number, profile};
pub use sources::profile_file;

/// Errors that can occur while profiling an upload
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("the file contains no text")]
    EmptyContent,

    #[error("need a header and at least one data row, found {found} usable line(s)")]
    InsufficientRows { found: usize },

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(error: serde_json::Error) -> Self {
        DataError::Config(error.to_string())
    }
}
