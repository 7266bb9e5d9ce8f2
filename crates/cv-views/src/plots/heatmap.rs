//! Correlation heatmap of the leading numeric columns

use egui::Color32;
use serde::Serialize;
use cv_core::{CellValue, DatasetSummary};

use crate::config::{Canvas, ChartConfig};
use super::utils::colors::correlation_fill;
use super::utils::stats::correlation_matrix;
use super::{Axes, Rect, Tick};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationData {
    pub columns: Vec<String>,
    /// Row-major, `matrix[i][j]` correlates `columns[i]` with `columns[j]`
    pub matrix: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatCell {
    pub row: usize,
    pub col: usize,
    pub value: f64,
    pub rect: Rect,
    pub color: Color32,
    pub opacity: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapGeometry {
    pub data: CorrelationData,
    pub cells: Vec<HeatCell>,
    pub cell_size: f64,
    pub axes: Axes,
}

/// Pairwise correlations, `None` with fewer than two numeric columns
pub fn aggregate(summary: &DatasetSummary, config: &ChartConfig) -> Option<CorrelationData> {
    let columns: Vec<String> = summary
        .numeric_columns()
        .take(config.heatmap_columns)
        .map(|c| c.name.clone())
        .collect();
    if columns.len() < 2 {
        return None;
    }

    let values: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|name| {
            summary
                .rows
                .iter()
                .map(|row| row.get(name).and_then(CellValue::as_number))
                .collect()
        })
        .collect();

    Some(CorrelationData {
        matrix: correlation_matrix(&values),
        columns,
    })
}

/// Square grid anchored at the top-left of the plot area
pub fn layout(data: CorrelationData, canvas: &Canvas) -> HeatmapGeometry {
    let size = data.columns.len();
    let cell = canvas.plot_width().min(canvas.plot_height()) / size as f64;

    let mut cells = Vec::with_capacity(size * size);
    for (i, row) in data.matrix.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            let (color, opacity) = correlation_fill(value);
            cells.push(HeatCell {
                row: i,
                col: j,
                value,
                rect: Rect {
                    x: canvas.left() + j as f64 * cell,
                    y: canvas.top() + i as f64 * cell,
                    width: cell,
                    height: cell,
                },
                color,
                opacity,
                label: format!("{:.2}", value),
            });
        }
    }

    let x_ticks = data
        .columns
        .iter()
        .enumerate()
        .map(|(j, name)| Tick { position: canvas.left() + (j as f64 + 0.5) * cell, label: name.clone() })
        .collect();
    let y_ticks = data
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| Tick { position: canvas.top() + (i as f64 + 0.5) * cell, label: name.clone() })
        .collect();

    HeatmapGeometry {
        axes: Axes {
            x_label: String::new(),
            y_label: String::new(),
            x_range: [0.0, size as f64],
            y_range: [0.0, size as f64],
            x_ticks,
            y_ticks,
        },
        data,
        cells,
        cell_size: cell,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::test_support::summary;
    use crate::plots::utils::colors::{NEGATIVE, POSITIVE};
    use cv_core::ColumnKind::{Categorical, Numeric};

    #[test]
    fn test_needs_two_numeric_columns() {
        let data = summary(&[("a", Numeric), ("g", Categorical)], &[&["1", "x"], &["2", "y"]]);
        assert!(aggregate(&data, &ChartConfig::default()).is_none());
    }

    #[test]
    fn test_caps_at_six_columns() {
        let names = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let columns: Vec<_> = names.iter().map(|n| (*n, Numeric)).collect();
        let data = summary(&columns, &[&["1", "2", "3", "4", "5", "6", "7", "8"], &["2", "1", "3", "5", "4", "7", "6", "9"]]);
        let corr = aggregate(&data, &ChartConfig::default()).unwrap();

        assert_eq!(corr.columns.len(), 6);
        assert_eq!(corr.matrix.len(), 6);
        assert_eq!(corr.matrix[0][1], -1.0);
    }

    #[test]
    fn test_cells_fill_square_grid() {
        let data = summary(
            &[("x", Numeric), ("y", Numeric), ("z", Numeric)],
            &[&["1", "2", "3"], &["2", "4", "1"], &["3", "6", "2"]],
        );
        let config = ChartConfig::default();
        let corr = aggregate(&data, &config).unwrap();
        let geometry = layout(corr, &config.canvas);

        // min(480, 230) / 3
        let cell = 230.0 / 3.0;
        assert_eq!(geometry.cell_size, cell);
        assert_eq!(geometry.cells.len(), 9);

        let xy = &geometry.cells[1];
        assert_eq!((xy.row, xy.col), (0, 1));
        assert_eq!(xy.rect.x, 60.0 + cell);
        assert_eq!(xy.rect.y, 60.0);
        assert_eq!(xy.label, "1.00");
        assert_eq!((xy.color, xy.opacity), (POSITIVE, 1.0));

        let xz = &geometry.cells[2];
        assert_eq!(xz.color, NEGATIVE);
        assert_eq!(xz.label, "-0.50");
    }
}
