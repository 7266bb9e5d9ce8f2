//! Line and area charts

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use cv_core::{CellValue, DatasetSummary};

use crate::config::{Canvas, ChartConfig};
use super::utils::scale::{area_path, format_value, polyline_path, scale, ticks};
use super::utils::stats::min_max;
use super::{Axes, Point, Tick};

/// Column consulted for the x position when no second numeric column exists
pub const DATE_COLUMN: &str = "date";

/// Where x values come from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", content = "column", rename_all = "snake_case")]
pub enum XSource {
    Column(String),
    Date,
    Index,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineData {
    pub y_column: String,
    pub x_source: XSource,
    /// `(x, y)` in row order
    pub values: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineGeometry {
    pub data: LineData,
    pub points: Vec<Point>,
    pub path: String,
    /// Present for area charts
    pub area_path: Option<String>,
    pub baseline: f64,
    pub axes: Axes,
}

/// Parse a `date` cell to epoch milliseconds
pub fn date_millis(cell: &CellValue) -> Option<f64> {
    let text = match cell {
        CellValue::Number(v) => return Some(*v),
        CellValue::Text(s) => s.trim(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis() as f64);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis() as f64);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis() as f64)
}

/// First numeric column against the second one, a date column, or row index
pub fn aggregate(summary: &DatasetSummary, config: &ChartConfig) -> Option<LineData> {
    let mut numeric = summary.numeric_columns();
    let y_column = numeric.next()?.name.clone();
    let x_source = match numeric.next() {
        Some(column) => XSource::Column(column.name.clone()),
        None if summary.column(DATE_COLUMN).is_some() => XSource::Date,
        None => XSource::Index,
    };

    let mut values = Vec::new();
    for (idx, row) in summary.rows.iter().take(config.line_rows).enumerate() {
        let Some(y) = row.get(&y_column).and_then(CellValue::as_number) else {
            continue;
        };
        let x = match &x_source {
            XSource::Column(column) => match row.get(column).and_then(CellValue::as_number) {
                Some(x) => x,
                None => continue,
            },
            XSource::Date => row.get(DATE_COLUMN).and_then(date_millis).unwrap_or(idx as f64),
            XSource::Index => idx as f64,
        };
        values.push((x, y));
    }

    if values.is_empty() {
        return None;
    }

    Some(LineData { y_column, x_source, values })
}

fn x_label(value: f64, source: &XSource) -> String {
    match source {
        XSource::Date => DateTime::from_timestamp_millis(value as i64)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| format_value(value)),
        _ => format_value(value),
    }
}

/// Polyline through the scaled points, closed to the baseline for area charts
pub fn layout(data: LineData, area: bool, canvas: &Canvas) -> LineGeometry {
    let xs: Vec<f64> = data.values.iter().map(|(x, _)| *x).collect();
    let ys: Vec<f64> = data.values.iter().map(|(_, y)| *y).collect();
    let (x_min, x_max) = min_max(&xs).unwrap_or((0.0, 0.0));
    let (y_min, y_max) = min_max(&ys).unwrap_or((0.0, 0.0));

    let points: Vec<Point> = data
        .values
        .iter()
        .map(|&(x, y)| {
            Point::new(
                scale(x, x_min, x_max, canvas.left(), canvas.right()),
                scale(y, y_min, y_max, canvas.bottom(), canvas.top()),
            )
        })
        .collect();

    let baseline = canvas.bottom();
    let path = polyline_path(&points);
    let area_path = area.then(|| area_path(&points, baseline));

    let x_title = match &data.x_source {
        XSource::Column(column) => column.clone(),
        XSource::Date => DATE_COLUMN.to_string(),
        XSource::Index => "Row".to_string(),
    };
    let x_ticks = vec![
        Tick { position: canvas.left(), label: x_label(x_min, &data.x_source) },
        Tick { position: canvas.right(), label: x_label(x_max, &data.x_source) },
    ];

    LineGeometry {
        axes: Axes {
            x_label: x_title,
            y_label: data.y_column.clone(),
            x_range: [x_min, x_max],
            y_range: [y_min, y_max],
            x_ticks,
            y_ticks: ticks(y_min, y_max, 5, canvas.bottom(), canvas.top()),
        },
        data,
        points,
        path,
        area_path,
        baseline,
    }
}
