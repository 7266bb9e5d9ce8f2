//! Scatter plot of the first two numeric columns

use egui::Color32;
use serde::Serialize;
use cv_core::{CellValue, DatasetSummary};

use crate::config::{Canvas, ChartConfig};
use super::utils::colors::categorical_color;
use super::utils::scale::{scale, ticks};
use super::utils::stats::min_max;
use super::{Axes, Point};

pub const POINT_RADIUS: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterData {
    pub x_column: String,
    pub y_column: String,
    pub values: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterGeometry {
    pub data: ScatterData,
    pub points: Vec<Point>,
    pub radius: f64,
    pub color: Color32,
    pub axes: Axes,
}

/// Pairs of the first two numeric columns over the leading rows
pub fn aggregate(summary: &DatasetSummary, config: &ChartConfig) -> Option<ScatterData> {
    let mut numeric = summary.numeric_columns();
    let x_column = numeric.next()?.name.clone();
    let y_column = numeric.next()?.name.clone();

    let values: Vec<(f64, f64)> = summary
        .rows
        .iter()
        .take(config.scatter_rows)
        .filter_map(|row| {
            let x = row.get(&x_column).and_then(CellValue::as_number)?;
            let y = row.get(&y_column).and_then(CellValue::as_number)?;
            Some((x, y))
        })
        .collect();

    if values.is_empty() {
        return None;
    }

    Some(ScatterData { x_column, y_column, values })
}

/// Each axis scaled independently from its observed range
pub fn layout(data: ScatterData, canvas: &Canvas) -> ScatterGeometry {
    let xs: Vec<f64> = data.values.iter().map(|(x, _)| *x).collect();
    let ys: Vec<f64> = data.values.iter().map(|(_, y)| *y).collect();
    let (x_min, x_max) = min_max(&xs).unwrap_or((0.0, 0.0));
    let (y_min, y_max) = min_max(&ys).unwrap_or((0.0, 0.0));

    let points = data
        .values
        .iter()
        .map(|&(x, y)| {
            Point::new(
                scale(x, x_min, x_max, canvas.left(), canvas.right()),
                scale(y, y_min, y_max, canvas.bottom(), canvas.top()),
            )
        })
        .collect();

    ScatterGeometry {
        axes: Axes {
            x_label: data.x_column.clone(),
            y_label: data.y_column.clone(),
            x_range: [x_min, x_max],
            y_range: [y_min, y_max],
            x_ticks: ticks(x_min, x_max, 5, canvas.left(), canvas.right()),
            y_ticks: ticks(y_min, y_max, 5, canvas.bottom(), canvas.top()),
        },
        data,
        points,
        radius: POINT_RADIUS,
        color: categorical_color(0),
    }
}
