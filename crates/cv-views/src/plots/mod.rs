//! Aggregation and geometry per chart family
//!
//! Every family module has two stages: an `aggregate` function selecting the
//! columns it needs from a [`DatasetSummary`] and computing the numbers to
//! plot, and a `layout` function mapping those numbers onto the [`Canvas`].

pub mod bar;
pub mod box_plot;
pub mod density;
pub mod heatmap;
pub mod line;
pub mod scatter;
pub mod violin;

// Utilities
pub mod utils;

use indexmap::IndexMap;
use serde::Serialize;
use cv_core::{ColumnProfile, DatasetSummary};

use crate::config::Canvas;

// Re-exports
pub use bar::{BarGeometry, BarKind, BarShape, CategoryTotal, HistogramBin};
pub use box_plot::{BoxGeometry, BoxShape};
pub use density::{DensityGeometry, RidgeLayer, RidgelineGeometry};
pub use heatmap::{CorrelationData, HeatCell, HeatmapGeometry};
pub use line::{LineData, LineGeometry, XSource};
pub use scatter::{ScatterData, ScatterGeometry};
pub use violin::{ViolinGeometry, ViolinShape};

/// A position on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, `(x, y)` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Straight line between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    pub fn horizontal(x1: f64, x2: f64, y: f64) -> Self {
        Self::new(Point::new(x1, y), Point::new(x2, y))
    }

    pub fn vertical(x: f64, y1: f64, y2: f64) -> Self {
        Self::new(Point::new(x, y1), Point::new(x, y2))
    }
}

/// Axis label at a canvas coordinate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// Axis titles, data ranges and tick marks of a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axes {
    pub x_label: String,
    pub y_label: String,
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

/// Drawable result for one chart family
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartGeometry {
    /// Bar chart and histogram
    Bars(BarGeometry),
    /// Line and area chart
    Line(LineGeometry),
    Scatter(ScatterGeometry),
    Box(BoxGeometry),
    Violin(ViolinGeometry),
    Density(DensityGeometry),
    Ridgeline(RidgelineGeometry),
    Heatmap(HeatmapGeometry),
}

impl ChartGeometry {
    pub fn axes(&self) -> &Axes {
        match self {
            ChartGeometry::Bars(g) => &g.axes,
            ChartGeometry::Line(g) => &g.axes,
            ChartGeometry::Scatter(g) => &g.axes,
            ChartGeometry::Box(g) => &g.axes,
            ChartGeometry::Violin(g) => &g.axes,
            ChartGeometry::Density(g) => &g.axes,
            ChartGeometry::Ridgeline(g) => &g.axes,
            ChartGeometry::Heatmap(g) => &g.axes,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Values of one numeric column split by a category
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedValues {
    pub value_column: String,
    /// `None` when everything falls in the implicit "All" group
    pub group_column: Option<String>,
    /// Groups in first-seen order
    pub groups: Vec<(String, Vec<f64>)>,
}

pub const ALL_GROUP: &str = "All";

pub(crate) fn first_numeric(summary: &DatasetSummary) -> Option<&ColumnProfile> {
    summary.numeric_columns().next()
}

pub(crate) fn first_categorical(summary: &DatasetSummary) -> Option<&ColumnProfile> {
    summary.categorical_columns().next()
}

/// Group the first numeric column by the first categorical column.
///
/// Values of categories seen after the first `max_groups` are ignored.
pub fn group_by_category(summary: &DatasetSummary, max_groups: usize) -> Option<GroupedValues> {
    let value_column = first_numeric(summary)?.name.clone();
    let group_column = first_categorical(summary).map(|c| c.name.clone());

    let mut groups: IndexMap<String, Vec<f64>> = IndexMap::new();
    for row in &summary.rows {
        let Some(value) = row.get(&value_column).and_then(|c| c.as_number()) else {
            continue;
        };
        let key = match &group_column {
            Some(column) => row.get(column).map(|c| c.to_string()).unwrap_or_default(),
            None => ALL_GROUP.to_string(),
        };
        if !groups.contains_key(&key) && groups.len() >= max_groups {
            continue;
        }
        groups.entry(key).or_default().push(value);
    }

    if groups.is_empty() {
        return None;
    }

    Some(GroupedValues {
        value_column,
        group_column,
        groups: groups.into_iter().collect(),
    })
}

/// Centre of slot `index` when the plot width is split into `count` slots
pub(crate) fn slot_center(canvas: &Canvas, index: usize, count: usize) -> f64 {
    let slot = canvas.plot_width() / count as f64;
    canvas.left() + slot * (index as f64 + 0.5)
}

/// One tick per slot, labelled with the group names
pub(crate) fn slot_ticks(canvas: &Canvas, labels: &[String]) -> Vec<Tick> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| Tick {
            position: slot_center(canvas, i, labels.len()),
            label: label.clone(),
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use super::test_support::summary;
    use cv_core::ColumnKind::{Categorical, Numeric};

    #[test]
    fn test_grouping_keeps_first_seen_order_and_caps() {
        let data = summary(
            &[("g", Categorical), ("v", Numeric)],
            &[&["b", "1"], &["a", "2"], &["c", "3"], &["b", "4"], &["d", "5"], &["e", "6"], &["f", "7"], &["a", "8"]],
        );
        let grouped = group_by_category(&data, 5).unwrap();

        let names: Vec<_> = grouped.groups.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c", "d", "e"]);
        assert_eq!(grouped.groups[0].1, vec![1.0, 4.0]);
        assert_eq!(grouped.groups[1].1, vec![2.0, 8.0]);
    }

    #[test]
    fn test_grouping_without_category() {
        let data = summary(&[("v", Numeric)], &[&["1"], &["x"], &["3"]]);
        let grouped = group_by_category(&data, 5).unwrap();

        assert_eq!(grouped.group_column, None);
        assert_eq!(grouped.groups, vec![(ALL_GROUP.to_string(), vec![1.0, 3.0])]);
    }

    #[test]
    fn test_grouping_needs_numeric() {
        let data = summary(&[("g", Categorical)], &[&["a"]]);
        assert!(group_by_category(&data, 5).is_none());
    }
}
