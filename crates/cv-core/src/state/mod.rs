use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};

use crate::chart_type::ChartType;
use crate::dataset::DatasetSummary;
use crate::detection::DetectionResult;
use crate::events::{events, EventBus};

/// Token identifying one in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the user is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AppMode {
    /// Exploring an uploaded CSV
    #[default]
    Upload,
    /// Classifying a chart image
    Detect,
}

/// The dataset of the current upload
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub file_name: String,
    pub summary: Arc<DatasetSummary>,
}

/// Every state transition goes through one of these
#[derive(Debug, Clone)]
pub enum Action {
    SetMode(AppMode),
    UploadProfiled {
        generation: Generation,
        file_name: String,
        summary: DatasetSummary,
    },
    UploadFailed {
        generation: Generation,
        file_name: String,
        error: String,
    },
    DetectionFinished {
        generation: Generation,
        result: DetectionResult,
    },
    SelectChart(ChartType),
    Reset,
}

/// Outcome of [`AppState::dispatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The state changed and its version was bumped
    Applied,
    /// The action answered a request that is no longer current
    Stale,
    /// The action had nothing to act on
    Ignored,
}

/// The session state
pub struct AppState {
    /// Event bus notified of every applied transition
    pub events: Arc<EventBus>,

    mode: AppMode,
    version: u64,
    next_generation: u64,
    pending_upload: Option<(Generation, String)>,
    pending_detection: Option<Generation>,
    dataset: Option<LoadedDataset>,
    selected_chart: Option<ChartType>,
    detection: Option<DetectionResult>,
    last_error: Option<String>,
}

impl AppState {
    /// Create an empty session
    pub fn new() -> Self {
        Self::with_events(Arc::new(EventBus::new()))
    }

    /// Create an empty session publishing to an existing bus
    pub fn with_events(events: Arc<EventBus>) -> Self {
        Self {
            events,
            mode: AppMode::default(),
            version: 0,
            next_generation: 0,
            pending_upload: None,
            pending_detection: None,
            dataset: None,
            selected_chart: None,
            detection: None,
            last_error: None,
        }
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Bumped on every applied transition
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn dataset(&self) -> Option<&LoadedDataset> {
        self.dataset.as_ref()
    }

    pub fn selected_chart(&self) -> Option<ChartType> {
        self.selected_chart
    }

    pub fn detection(&self) -> Option<&DetectionResult> {
        self.detection.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Name of the file being profiled, if any
    pub fn pending_upload(&self) -> Option<&str> {
        self.pending_upload.as_ref().map(|(_, name)| name.as_str())
    }

    pub fn is_detecting(&self) -> bool {
        self.pending_detection.is_some()
    }

    /// Start an upload; results must carry the returned token
    pub fn begin_upload(&mut self, file_name: impl Into<String>) -> Generation {
        let generation = self.next_generation();
        let file_name = file_name.into();
        tracing::debug!("Upload {} started for '{}'", generation, file_name);
        self.pending_upload = Some((generation, file_name));
        self.last_error = None;
        self.version += 1;
        generation
    }

    /// Start a detection request; results must carry the returned token
    pub fn begin_detection(&mut self) -> Generation {
        let generation = self.next_generation();
        tracing::debug!("Detection {} started", generation);
        self.pending_detection = Some(generation);
        self.version += 1;
        generation
    }

    /// Apply an action
    pub fn dispatch(&mut self, action: Action) -> Dispatch {
        let outcome = match action {
            Action::SetMode(mode) => {
                if self.mode == mode {
                    Dispatch::Ignored
                } else {
                    self.mode = mode;
                    self.events.publish(events::ModeChanged { mode });
                    Dispatch::Applied
                }
            }
            Action::UploadProfiled { generation, file_name, summary } => {
                if !self.is_current_upload(generation) {
                    return self.discard(generation, self.pending_upload.as_ref().map(|(g, _)| *g));
                }
                self.pending_upload = None;

                tracing::info!(
                    "Loaded '{}': ~{} rows, {} columns",
                    file_name,
                    summary.estimated_row_count,
                    summary.column_count
                );
                self.events.publish(events::DatasetLoaded {
                    file_name: file_name.clone(),
                    estimated_row_count: summary.estimated_row_count,
                    column_count: summary.column_count,
                });
                self.dataset = Some(LoadedDataset {
                    file_name,
                    summary: Arc::new(summary),
                });
                self.last_error = None;
                Dispatch::Applied
            }
            Action::UploadFailed { generation, file_name, error } => {
                if !self.is_current_upload(generation) {
                    return self.discard(generation, self.pending_upload.as_ref().map(|(g, _)| *g));
                }
                self.pending_upload = None;

                tracing::error!("Failed to profile '{}': {}", file_name, error);
                self.events.publish(events::DatasetRejected {
                    file_name,
                    error: error.clone(),
                });
                self.last_error = Some(error);
                Dispatch::Applied
            }
            Action::DetectionFinished { generation, result } => {
                if self.pending_detection != Some(generation) {
                    return self.discard(generation, self.pending_detection);
                }
                self.pending_detection = None;

                self.events.publish(events::DetectionCompleted {
                    chart_type: result.chart_type.clone(),
                    confidence: result.confidence,
                });
                self.detection = Some(result);
                Dispatch::Applied
            }
            Action::SelectChart(chart_type) => {
                if self.dataset.is_none() {
                    Dispatch::Ignored
                } else {
                    self.selected_chart = Some(chart_type);
                    self.events.publish(events::ChartSelected { chart_type });
                    Dispatch::Applied
                }
            }
            Action::Reset => {
                self.mode = AppMode::default();
                self.pending_upload = None;
                self.pending_detection = None;
                self.dataset = None;
                self.selected_chart = None;
                self.detection = None;
                self.last_error = None;
                self.events.publish(events::SessionReset);
                Dispatch::Applied
            }
        };

        if outcome == Dispatch::Applied {
            self.version += 1;
        }
        outcome
    }

    fn next_generation(&mut self) -> Generation {
        self.next_generation += 1;
        Generation(self.next_generation)
    }

    fn is_current_upload(&self, generation: Generation) -> bool {
        matches!(&self.pending_upload, Some((current, _)) if *current == generation)
    }

    fn discard(&self, generation: Generation, current: Option<Generation>) -> Dispatch {
        tracing::warn!("Discarding stale result {} (current: {:?})", generation, current);
        self.events.publish(events::StaleResultDiscarded { generation, current });
        Dispatch::Stale
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
