//! Chart engine configuration

use serde::{Deserialize, Serialize};

/// Fixed logical drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    /// Applied on all four sides
    pub padding: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 350.0,
            padding: 60.0,
        }
    }
}

impl Canvas {
    pub fn plot_width(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    pub fn plot_height(&self) -> f64 {
        self.height - 2.0 * self.padding
    }

    pub fn left(&self) -> f64 {
        self.padding
    }

    pub fn right(&self) -> f64 {
        self.padding + self.plot_width()
    }

    pub fn top(&self) -> f64 {
        self.padding
    }

    /// The x axis baseline
    pub fn bottom(&self) -> f64 {
        self.padding + self.plot_height()
    }
}

/// Bin counts, caps and canvas used by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub canvas: Canvas,
    pub histogram_bins: usize,
    pub density_bins: usize,
    pub violin_bins: usize,
    pub ridgeline_bins: usize,
    /// Categories kept by the bar chart
    pub max_bar_groups: usize,
    /// Groups kept by box, violin and ridgeline plots
    pub max_groups: usize,
    pub line_rows: usize,
    pub scatter_rows: usize,
    pub heatmap_columns: usize,
    /// Bar labels are drawn only below this many categories
    pub bar_label_limit: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            histogram_bins: 15,
            density_bins: 30,
            violin_bins: 20,
            ridgeline_bins: 40,
            max_bar_groups: 8,
            max_groups: 5,
            line_rows: 50,
            scatter_rows: 100,
            heatmap_columns: 6,
            bar_label_limit: 12,
        }
    }
}
