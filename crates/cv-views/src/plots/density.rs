//! Density and ridgeline plots built on binned, smoothed counts

use egui::Color32;
use serde::Serialize;
use cv_core::DatasetSummary;

use crate::config::{Canvas, ChartConfig};
use super::utils::colors::categorical_color;
use super::utils::scale::{area_path, polyline_path, scale, ticks};
use super::utils::stats::{min_max, pseudo_kde, pseudo_kde_in_range, DensityCurve};
use super::{first_numeric, group_by_category, Axes, Point, Tick, ALL_GROUP};

/// Vertical step between ridge baselines as a share of the layer height
pub const RIDGE_OFFSET: f64 = 0.7;
/// Base peak height as a share of the layer height
pub const RIDGE_BASE_HEIGHT: f64 = 0.4;
/// Amplification applied to the base peak height
pub const RIDGE_AMPLIFY: f64 = 2.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityGeometry {
    pub column: String,
    pub curve: DensityCurve,
    pub points: Vec<Point>,
    pub path: String,
    pub area_path: String,
    pub baseline: f64,
    pub color: Color32,
    pub axes: Axes,
}

/// One stacked curve of a ridgeline chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RidgeLayer {
    pub label: String,
    pub baseline: f64,
    pub curve: DensityCurve,
    pub points: Vec<Point>,
    pub path: String,
    pub area_path: String,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RidgelineGeometry {
    pub layers: Vec<RidgeLayer>,
    pub axes: Axes,
}

/// Density curve of the first numeric column
pub fn aggregate(summary: &DatasetSummary, config: &ChartConfig) -> Option<(String, DensityCurve)> {
    let column = first_numeric(summary)?.name.clone();
    let curve = pseudo_kde(&summary.numeric_values(&column), config.density_bins)?;
    Some((column, curve))
}

pub fn layout(column: &str, curve: DensityCurve, canvas: &Canvas) -> DensityGeometry {
    let max_density = curve.max_density();
    let points: Vec<Point> = curve
        .points
        .iter()
        .map(|p| {
            Point::new(
                scale(p.value, curve.min, curve.max, canvas.left(), canvas.right()),
                scale(p.density, 0.0, max_density, canvas.bottom(), canvas.top()),
            )
        })
        .collect();

    DensityGeometry {
        column: column.to_string(),
        path: polyline_path(&points),
        area_path: area_path(&points, canvas.bottom()),
        baseline: canvas.bottom(),
        color: categorical_color(0),
        axes: Axes {
            x_label: column.to_string(),
            y_label: "Density".to_string(),
            x_range: [curve.min, curve.max],
            y_range: [0.0, max_density],
            x_ticks: ticks(curve.min, curve.max, 5, canvas.left(), canvas.right()),
            y_ticks: ticks(0.0, max_density, 5, canvas.bottom(), canvas.top()),
        },
        curve,
        points,
    }
}

/// Value column, group column and per-group curves over the shared range
pub type RidgelineData = (String, Option<String>, Vec<(String, DensityCurve)>);

/// One curve per group, binned over the range of all plotted values
pub fn aggregate_ridgeline(summary: &DatasetSummary, config: &ChartConfig) -> Option<RidgelineData> {
    let grouped = group_by_category(summary, config.max_groups)?;
    let all: Vec<f64> = grouped.groups.iter().flat_map(|(_, v)| v.iter().copied()).collect();
    let (min, max) = min_max(&all)?;

    let curves = grouped
        .groups
        .iter()
        .map(|(name, values)| (name.clone(), pseudo_kde_in_range(values, config.ridgeline_bins, min, max)))
        .collect();

    Some((grouped.value_column, grouped.group_column, curves))
}

/// Overlapping layers, first group at the top.
///
/// Each layer is normalized to its own peak.
pub fn layout_ridgeline(data: &RidgelineData, canvas: &Canvas) -> RidgelineGeometry {
    let (value_column, group_column, curves) = data;
    let n = curves.len();
    let layer_height = canvas.plot_height() / n as f64;
    let offset = layer_height * RIDGE_OFFSET;
    let peak = layer_height * RIDGE_BASE_HEIGHT * RIDGE_AMPLIFY;

    let (min, max) = curves
        .first()
        .map(|(_, c)| (c.min, c.max))
        .unwrap_or((0.0, 0.0));

    let layers: Vec<RidgeLayer> = curves
        .iter()
        .enumerate()
        .map(|(i, (label, curve))| {
            let baseline = canvas.bottom() - (n - 1 - i) as f64 * offset;
            let layer_max = curve.max_density();
            let points: Vec<Point> = curve
                .points
                .iter()
                .map(|p| {
                    let height = if layer_max > 0.0 { p.density / layer_max * peak } else { 0.0 };
                    Point::new(scale(p.value, min, max, canvas.left(), canvas.right()), baseline - height)
                })
                .collect();

            RidgeLayer {
                label: label.clone(),
                baseline,
                curve: curve.clone(),
                path: polyline_path(&points),
                area_path: area_path(&points, baseline),
                points,
                color: categorical_color(i),
            }
        })
        .collect();

    let y_ticks = layers
        .iter()
        .map(|l| Tick { position: l.baseline, label: l.label.clone() })
        .collect();

    RidgelineGeometry {
        axes: Axes {
            x_label: value_column.clone(),
            y_label: group_column.clone().unwrap_or_else(|| ALL_GROUP.to_string()),
            x_range: [min, max],
            y_range: [0.0, n as f64],
            x_ticks: ticks(min, max, 5, canvas.left(), canvas.right()),
            y_ticks,
        },
        layers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::test_support::summary;
    use cv_core::ColumnKind::{Categorical, Numeric};

    #[test]
    fn test_density_spans_plot_area() {
        let data = summary(&[("v", Numeric)], &[&["0"], &["1"], &["1"], &["2"], &["30"]]);
        let config = ChartConfig::default();
        let (column, curve) = aggregate(&data, &config).unwrap();
        assert_eq!(curve.points.len(), 30);

        let geometry = layout(&column, curve, &config.canvas);
        let top = geometry.points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        assert_eq!(top, 60.0);
        assert!(geometry.points.iter().all(|p| p.x > 60.0 && p.x < 540.0));
        assert!(geometry.area_path.ends_with("Z"));
    }

    #[test]
    fn test_ridgeline_shares_range() {
        let data = summary(
            &[("g", Categorical), ("v", Numeric)],
            &[&["a", "0"], &["a", "1"], &["b", "9"], &["b", "10"]],
        );
        let (_, _, curves) = aggregate_ridgeline(&data, &ChartConfig::default()).unwrap();

        assert_eq!(curves.len(), 2);
        for (_, curve) in &curves {
            assert_eq!((curve.min, curve.max), (0.0, 10.0));
            assert_eq!(curve.points.len(), 40);
        }
    }

    #[test]
    fn test_ridgeline_baselines_and_peaks() {
        let data = summary(
            &[("g", Categorical), ("v", Numeric)],
            &[&["a", "0"], &["a", "5"], &["b", "5"], &["b", "10"]],
        );
        let config = ChartConfig::default();
        let ridges = aggregate_ridgeline(&data, &config).unwrap();
        let geometry = layout_ridgeline(&ridges, &config.canvas);

        // layer height 115, offset 80.5
        assert_eq!(geometry.layers[1].baseline, 290.0);
        assert!((geometry.layers[0].baseline - (290.0 - 80.5)).abs() < 1e-9);
        for layer in &geometry.layers {
            let peak = layer.points.iter().map(|p| layer.baseline - p.y).fold(0.0, f64::max);
            assert!((peak - 115.0).abs() < 1e-9);
        }
        assert_eq!(geometry.axes.y_ticks[0].label, "a");
    }
}
