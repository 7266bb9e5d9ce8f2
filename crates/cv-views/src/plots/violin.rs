//! Violin plot implementation for distribution visualization

use egui::Color32;
use serde::Serialize;
use cv_core::DatasetSummary;

use crate::config::{Canvas, ChartConfig};
use super::utils::colors::categorical_color;
use super::utils::scale::{polygon_path, scale, ticks};
use super::utils::stats::{pseudo_kde, DensityCurve};
use super::{group_by_category, slot_center, slot_ticks, Axes, Point, ALL_GROUP};

/// Largest half-width as a share of the group slot
const MAX_HALF_WIDTH: f64 = 0.4;

/// One mirrored density outline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinShape {
    pub label: String,
    pub center_x: f64,
    pub curve: DensityCurve,
    /// Right side bottom-up, then left side top-down
    pub outline: Vec<Point>,
    pub path: String,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinGeometry {
    pub violins: Vec<ViolinShape>,
    pub axes: Axes,
}

/// Value column, group column and one density curve per group
pub type ViolinData = (String, Option<String>, Vec<(String, DensityCurve)>);

/// Density curve of every group over the group's own range
pub fn aggregate(summary: &DatasetSummary, config: &ChartConfig) -> Option<ViolinData> {
    let grouped = group_by_category(summary, config.max_groups)?;
    let curves = grouped
        .groups
        .iter()
        .filter_map(|(name, values)| Some((name.clone(), pseudo_kde(values, config.violin_bins)?)))
        .collect();
    Some((grouped.value_column, grouped.group_column, curves))
}

/// Width normalized by the widest density across all groups, y shared
pub fn layout(data: &ViolinData, canvas: &Canvas) -> ViolinGeometry {
    let (value_column, group_column, curves) = data;
    let n = curves.len();
    let y_min = curves.iter().map(|(_, c)| c.min).fold(f64::INFINITY, f64::min);
    let y_max = curves.iter().map(|(_, c)| c.max).fold(f64::NEG_INFINITY, f64::max);
    let max_density = curves.iter().map(|(_, c)| c.max_density()).fold(0.0, f64::max);
    let max_half = canvas.plot_width() / n as f64 * MAX_HALF_WIDTH;

    let violins = curves
        .iter()
        .enumerate()
        .map(|(i, (label, curve))| {
            let cx = slot_center(canvas, i, n);
            let edge: Vec<(f64, f64)> = curve
                .points
                .iter()
                .map(|p| {
                    let half = if max_density > 0.0 {
                        scale(p.density, 0.0, max_density, 0.0, max_half)
                    } else {
                        0.0
                    };
                    (scale(p.value, y_min, y_max, canvas.bottom(), canvas.top()), half)
                })
                .collect();

            let outline: Vec<Point> = edge
                .iter()
                .map(|&(y, half)| Point::new(cx + half, y))
                .chain(edge.iter().rev().map(|&(y, half)| Point::new(cx - half, y)))
                .collect();

            ViolinShape {
                label: label.clone(),
                center_x: cx,
                curve: curve.clone(),
                path: polygon_path(&outline),
                outline,
                color: categorical_color(i),
            }
        })
        .collect();

    let labels: Vec<String> = curves.iter().map(|(label, _)| label.clone()).collect();

    ViolinGeometry {
        violins,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::test_support::summary;
    use cv_core::ColumnKind::{Categorical, Numeric};

    #[test]
    fn test_each_group_uses_own_range() {
        let data = summary(
            &[("g", Categorical), ("v", Numeric)],
            &[&["a", "0"], &["a", "10"], &["b", "100"], &["b", "120"]],
        );
        let (_, _, curves) = aggregate(&data, &ChartConfig::default()).unwrap();

        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].1.points.len(), 20);
        assert_eq!((curves[0].1.min, curves[0].1.max), (0.0, 10.0));
        assert_eq!((curves[1].1.min, curves[1].1.max), (100.0, 120.0));
    }

    #[test]
    fn test_outline_is_mirrored() {
        let data = summary(&[("v", Numeric)], &[&["1"], &["2"], &["2"], &["3"]]);
        let config = ChartConfig::default();
        let violin = aggregate(&data, &config).unwrap();
        let geometry = layout(&violin, &config.canvas);

        let shape = &geometry.violins[0];
        assert_eq!(shape.center_x, 300.0);
        let bins = shape.curve.points.len();
        assert_eq!(shape.outline.len(), bins * 2);
        for k in 0..bins {
            let right = shape.outline[k];
            let left = shape.outline[bins * 2 - 1 - k];
            assert_eq!(right.y, left.y);
            assert!((right.x - shape.center_x - (shape.center_x - left.x)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_widest_point_fills_slot_share() {
        let data = summary(
            &[("g", Categorical), ("v", Numeric)],
            &[&["a", "1"], &["a", "1"], &["a", "1"], &["a", "2"], &["b", "5"], &["b", "6"]],
        );
        let config = ChartConfig::default();
        let violin = aggregate(&data, &config).unwrap();
        let geometry = layout(&violin, &config.canvas);

        // two slots of 240, widest half-width 96
        let widest = geometry
            .violins
            .iter()
            .flat_map(|v| v.outline.iter().map(move |p| p.x - v.center_x))
            .fold(0.0, f64::max);
        assert!((widest - 96.0).abs() < 1e-9);
        assert_eq!(geometry.axes.y_range, [1.0, 6.0]);
    }
}
