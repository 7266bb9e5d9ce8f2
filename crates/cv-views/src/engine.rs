//! Chart engine: chart type + dataset summary in, geometry out

use serde::Serialize;
use tracing::{debug, info};
use cv_core::{ChartType, DatasetSummary};

use crate::config::ChartConfig;
use crate::plots::{bar, box_plot, density, heatmap, line, scatter, violin, ChartGeometry};

/// Result of a render request that a caller can always draw something for
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartOutcome {
    Ready(ChartGeometry),
    InsufficientData { chart_type: ChartType, reason: String },
}

impl ChartOutcome {
    pub fn geometry(&self) -> Option<&ChartGeometry> {
        match self {
            ChartOutcome::Ready(geometry) => Some(geometry),
            ChartOutcome::InsufficientData { .. } => None,
        }
    }
}

/// Recomputes aggregates and geometry on every call; nothing is cached
#[derive(Debug, Clone, Default)]
pub struct ChartEngine {
    config: ChartConfig,
}

impl ChartEngine {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Geometry for `chart_type`, `None` when the columns it needs are missing
    pub fn render(&self, chart_type: ChartType, summary: &DatasetSummary) -> Option<ChartGeometry> {
        let geometry = self.build(chart_type, summary);
        if geometry.is_none() {
            info!(chart = %chart_type, "Insufficient data for chart");
        }
        geometry
    }

    pub fn outcome(&self, chart_type: ChartType, summary: &DatasetSummary) -> ChartOutcome {
        match self.render(chart_type, summary) {
            Some(geometry) => ChartOutcome::Ready(geometry),
            None => ChartOutcome::InsufficientData {
                chart_type,
                reason: insufficient_reason(chart_type),
            },
        }
    }

    fn build(&self, chart_type: ChartType, summary: &DatasetSummary) -> Option<ChartGeometry> {
        let config = &self.config;
        let canvas = &config.canvas;

        let geometry = match chart_type {
            ChartType::Bar => {
                let (category, value, totals) = bar::aggregate_categories(summary, config)?;
                debug!(category = %category, value = %value, groups = totals.len(), "Bar chart columns");
                ChartGeometry::Bars(bar::layout_categories(&category, &value, &totals, config))
            }
            ChartType::Histogram => {
                let (column, bins) = bar::aggregate_histogram(summary, config)?;
                debug!(column = %column, bins = bins.len(), "Histogram column");
                ChartGeometry::Bars(bar::layout_histogram(&column, &bins, canvas))
            }
            ChartType::Line | ChartType::Area => {
                let data = line::aggregate(summary, config)?;
                debug!(y = %data.y_column, x = ?data.x_source, points = data.values.len(), "Line columns");
                ChartGeometry::Line(line::layout(data, chart_type == ChartType::Area, canvas))
            }
            ChartType::Scatter => {
                let data = scatter::aggregate(summary, config)?;
                debug!(x = %data.x_column, y = %data.y_column, points = data.values.len(), "Scatter columns");
                ChartGeometry::Scatter(scatter::layout(data, canvas))
            }
            ChartType::Box => {
                let data = box_plot::aggregate(summary, config)?;
                debug!(value = %data.0, groups = data.2.len(), "Box plot groups");
                ChartGeometry::Box(box_plot::layout(&data, canvas))
            }
            ChartType::Violin => {
                let data = violin::aggregate(summary, config)?;
                debug!(value = %data.0, groups = data.2.len(), "Violin groups");
                ChartGeometry::Violin(violin::layout(&data, canvas))
            }
            ChartType::Density => {
                let (column, curve) = density::aggregate(summary, config)?;
                debug!(column = %column, "Density column");
                ChartGeometry::Density(density::layout(&column, curve, canvas))
            }
            ChartType::Ridgeline => {
                let data = density::aggregate_ridgeline(summary, config)?;
                debug!(value = %data.0, layers = data.2.len(), "Ridgeline groups");
                ChartGeometry::Ridgeline(density::layout_ridgeline(&data, canvas))
            }
            ChartType::Heatmap => {
                let data = heatmap::aggregate(summary, config)?;
                debug!(columns = ?data.columns, "Heatmap columns");
                ChartGeometry::Heatmap(heatmap::layout(data, canvas))
            }
        };

        Some(geometry)
    }
}

fn insufficient_reason(chart_type: ChartType) -> String {
    let numeric = chart_type.min_numeric_columns();
    let columns = if numeric == 1 {
        "a numeric column".to_string()
    } else {
        format!("{} numeric columns", numeric)
    };

    if chart_type.requires_categorical() {
        format!("{} needs a categorical column and {}", chart_type.label(), columns)
    } else {
        format!("{} needs {}", chart_type.label(), columns)
    }
}
