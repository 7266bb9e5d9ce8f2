//! Chart family selector

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The chart families the engine can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartType {
    Bar,
    Histogram,
    Line,
    Area,
    Scatter,
    Box,
    Violin,
    Density,
    Ridgeline,
    Heatmap,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown chart type: {0}")]
pub struct UnknownChartType(pub String);

impl ChartType {
    pub const ALL: [ChartType; 10] = [
        ChartType::Bar,
        ChartType::Histogram,
        ChartType::Line,
        ChartType::Area,
        ChartType::Scatter,
        ChartType::Box,
        ChartType::Violin,
        ChartType::Density,
        ChartType::Ridgeline,
        ChartType::Heatmap,
    ];

    /// Stable identifier used in config files and on the wire
    pub fn id(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Histogram => "histogram",
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::Scatter => "scatter",
            ChartType::Box => "box",
            ChartType::Violin => "violin",
            ChartType::Density => "density",
            ChartType::Ridgeline => "ridgeline",
            ChartType::Heatmap => "heatmap",
        }
    }

    /// Human readable name
    pub fn label(&self) -> &'static str {
        match self {
            ChartType::Bar => "Bar Chart",
            ChartType::Histogram => "Histogram",
            ChartType::Line => "Line Chart",
            ChartType::Area => "Area Chart",
            ChartType::Scatter => "Scatter Plot",
            ChartType::Box => "Box Plot",
            ChartType::Violin => "Violin Plot",
            ChartType::Density => "Density Plot",
            ChartType::Ridgeline => "Ridgeline Plot",
            ChartType::Heatmap => "Correlation Heatmap",
        }
    }

    /// Whether the chart needs a categorical column to be drawn at all
    pub fn requires_categorical(&self) -> bool {
        matches!(self, ChartType::Bar)
    }

    /// Minimum number of numeric columns the chart needs
    pub fn min_numeric_columns(&self) -> usize {
        match self {
            ChartType::Scatter | ChartType::Heatmap => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ChartType {
    type Err = UnknownChartType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ChartType::ALL
            .iter()
            .copied()
            .find(|t| t.id() == needle)
            .ok_or_else(|| UnknownChartType(s.to_string()))
    }
}
