//! Box plot implementation for statistical data visualization

use egui::Color32;
use serde::Serialize;
use cv_core::DatasetSummary;

use crate::config::{Canvas, ChartConfig};
use super::utils::colors::categorical_color;
use super::utils::scale::{scale, ticks};
use super::utils::stats::{five_number, FiveNumber};
use super::{group_by_category, slot_center, slot_ticks, Axes, Rect, Segment, ALL_GROUP};

/// Box width as a share of the group slot
const BOX_WIDTH: f64 = 0.5;

/// One drawn box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxShape {
    pub label: String,
    pub count: usize,
    pub stats: FiveNumber,
    /// Q1 to Q3
    pub rect: Rect,
    /// Min to max through the centre
    pub whisker: Segment,
    pub median: Segment,
    pub caps: [Segment; 2],
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxGeometry {
    pub boxes: Vec<BoxShape>,
    pub axes: Axes,
}

/// Value column, group column and per-group summaries
pub type BoxData = (String, Option<String>, Vec<(String, usize, FiveNumber)>);

/// Five-number summary of every group
pub fn aggregate(summary: &DatasetSummary, config: &ChartConfig) -> Option<BoxData> {
    let grouped = group_by_category(summary, config.max_groups)?;
    let stats = grouped
        .groups
        .iter()
        .filter_map(|(name, values)| Some((name.clone(), values.len(), five_number(values)?)))
        .collect();
    Some((grouped.value_column, grouped.group_column, stats))
}

/// Boxes on a y scale shared by every group
pub fn layout(data: &BoxData, canvas: &Canvas) -> BoxGeometry {
    let (value_column, group_column, groups) = data;
    let n = groups.len();
    let y_min = groups.iter().map(|(_, _, s)| s.min).fold(f64::INFINITY, f64::min);
    let y_max = groups.iter().map(|(_, _, s)| s.max).fold(f64::NEG_INFINITY, f64::max);
    let y = |v: f64| scale(v, y_min, y_max, canvas.bottom(), canvas.top());

    let slot = canvas.plot_width() / n as f64;
    let half = slot * BOX_WIDTH / 2.0;
    let cap = half / 2.0;

    let boxes = groups
        .iter()
        .enumerate()
        .map(|(i, (label, count, stats))| {
            let cx = slot_center(canvas, i, n);
            let top = y(stats.q3);
            BoxShape {
                label: label.clone(),
                count: *count,
                stats: *stats,
                rect: Rect {
                    x: cx - half,
                    y: top,
                    width: half * 2.0,
                    height: y(stats.q1) - top,
                },
                whisker: Segment::vertical(cx, y(stats.min), y(stats.max)),
                median: Segment::horizontal(cx - half, cx + half, y(stats.median)),
                caps: [
                    Segment::horizontal(cx - cap, cx + cap, y(stats.min)),
                    Segment::horizontal(cx - cap, cx + cap, y(stats.max)),
                ],
                color: categorical_color(i),
            }
        })
        .collect();

    let labels: Vec<String> = groups.iter().map(|(label, _, _)| label.clone()).collect();

    BoxGeometry {
        boxes,
        axes: Axes {
            x_label: group_column.clone().unwrap_or_else(|| ALL_GROUP.to_string()),
            y_label: value_column.clone(),
            x_range: [0.0, n as f64],
            y_range: [y_min, y_max],
            x_ticks: slot_ticks(canvas, &labels),
            y_ticks: ticks(y_min, y_max, 5, canvas.bottom(), canvas.top()),
        },
    }
}
