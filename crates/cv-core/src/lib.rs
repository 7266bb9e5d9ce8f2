//! Core functionality for the chart sketching tool
//!
//! This crate provides the shared data model, the session state with its
//! update dispatcher, and the contracts of the external collaborators.

pub mod chart_type;
pub mod dataset;
pub mod detection;
pub mod events;
pub mod state;

// Re-export commonly used types
pub use chart_type::{ChartType, UnknownChartType};
pub use dataset::{CellValue, ColumnKind, ColumnProfile, DatasetSummary, Record};
pub use detection::{ChartDetector, DetectionResult, detect_or_fallback, MAX_IMAGE_BYTES};
pub use events::EventBus;
pub use state::{Action, AppMode, AppState, Dispatch, Generation, LoadedDataset};
