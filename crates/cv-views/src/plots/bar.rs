//! Bar chart and histogram

use egui::Color32;
use indexmap::IndexMap;
use serde::Serialize;
use cv_core::DatasetSummary;

use crate::config::{Canvas, ChartConfig};
use super::utils::scale::{format_value, scale, ticks};
use super::utils::stats::{bin_counts, bin_width, min_max};
use super::utils::colors::categorical_color;
use super::{first_categorical, first_numeric, Axes, Rect, Tick};

/// Sum of the value column for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// One histogram bin, `[start, end)` except the last which is closed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarKind {
    Categorical,
    Histogram,
}

/// A drawn bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarShape {
    pub label: String,
    pub value: f64,
    pub rect: Rect,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGeometry {
    #[serde(rename = "bar_kind")]
    pub kind: BarKind,
    pub bars: Vec<BarShape>,
    /// Whether per-bar category labels are drawn
    pub show_labels: bool,
    pub axes: Axes,
}

/// Totals of the first numeric column per category of the first categorical one
pub fn aggregate_categories(summary: &DatasetSummary, config: &ChartConfig) -> Option<(String, String, Vec<CategoryTotal>)> {
    let category = first_categorical(summary)?.name.clone();
    let value = first_numeric(summary)?.name.clone();

    let mut totals: IndexMap<String, f64> = IndexMap::new();
    for row in &summary.rows {
        let key = row.get(&category).map(|c| c.to_string()).unwrap_or_default();
        let amount = row.get(&value).and_then(|c| c.as_number()).unwrap_or(0.0);
        *totals.entry(key).or_insert(0.0) += amount;
    }

    let totals: Vec<CategoryTotal> = totals
        .into_iter()
        .take(config.max_bar_groups)
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();

    if totals.is_empty() {
        return None;
    }
    Some((category, value, totals))
}

/// Fixed-count histogram of the first numeric column
pub fn aggregate_histogram(summary: &DatasetSummary, config: &ChartConfig) -> Option<(String, Vec<HistogramBin>)> {
    let column = first_numeric(summary)?.name.clone();
    let values = summary.numeric_values(&column);
    let (min, max) = min_max(&values)?;

    let width = bin_width(min, max, config.histogram_bins);
    let bins = bin_counts(&values, min, width, config.histogram_bins)
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count,
        })
        .collect();

    Some((column, bins))
}

/// Bars with a 30% gap, heights from zero to the largest total
pub fn layout_categories(category: &str, value: &str, totals: &[CategoryTotal], config: &ChartConfig) -> BarGeometry {
    let canvas = &config.canvas;
    let n = totals.len();
    let slot = canvas.plot_width() / n as f64;
    let width = slot * 0.7;
    let gap = slot * 0.3;
    let max = totals.iter().map(|t| t.total).fold(f64::NEG_INFINITY, f64::max);

    let bars = totals
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let height = scale(t.total, 0.0, max, 0.0, canvas.plot_height()).max(0.0);
            BarShape {
                label: t.category.clone(),
                value: t.total,
                rect: Rect {
                    x: canvas.left() + i as f64 * slot + gap / 2.0,
                    y: canvas.bottom() - height,
                    width,
                    height,
                },
                color: categorical_color(i),
            }
        })
        .collect::<Vec<_>>();

    let show_labels = n < config.bar_label_limit;
    let x_ticks = if show_labels {
        bars.iter()
            .map(|b| Tick { position: b.rect.center().x, label: b.label.clone() })
            .collect()
    } else {
        Vec::new()
    };

    BarGeometry {
        kind: BarKind::Categorical,
        bars,
        show_labels,
        axes: Axes {
            x_label: category.to_string(),
            y_label: format!("Sum of {}", value),
            x_range: [0.0, n as f64],
            y_range: [0.0, max],
            x_ticks,
            y_ticks: ticks(0.0, max, 5, canvas.bottom(), canvas.top()),
        },
    }
}

/// Contiguous bins separated by one unit
pub fn layout_histogram(column: &str, bins: &[HistogramBin], canvas: &Canvas) -> BarGeometry {
    let slot = canvas.plot_width() / bins.len() as f64;
    let max = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    let color = categorical_color(0);

    let bars = bins
        .iter()
        .enumerate()
        .map(|(i, bin)| {
            let height = scale(bin.count as f64, 0.0, max, 0.0, canvas.plot_height()).max(0.0);
            BarShape {
                label: format!("{}–{}", format_value(bin.start), format_value(bin.end)),
                value: bin.count as f64,
                rect: Rect {
                    x: canvas.left() + i as f64 * slot,
                    y: canvas.bottom() - height,
                    width: (slot - 1.0).max(0.0),
                    height,
                },
                color,
            }
        })
        .collect();

    let start = bins.first().map(|b| b.start).unwrap_or(0.0);
    let end = bins.last().map(|b| b.end).unwrap_or(0.0);

    BarGeometry {
        kind: BarKind::Histogram,
        bars,
        show_labels: false,
        axes: Axes {
            x_label: column.to_string(),
            y_label: "Count".to_string(),
            x_range: [start, end],
            y_range: [0.0, max],
            x_ticks: vec![
                Tick { position: canvas.left(), label: format_value(start) },
                Tick { position: canvas.right(), label: format_value(end) },
            ],
            y_ticks: ticks(0.0, max, 5, canvas.bottom(), canvas.top()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::test_support::summary;
    use cv_core::ColumnKind::{Categorical, Numeric};

    #[test]
    fn test_totals_keep_first_eight_seen() {
        let rows: Vec<Vec<String>> = (0..10)
            .flat_map(|i| vec![vec![format!("c{}", i), "1".to_string()], vec![format!("c{}", i), "2".to_string()]])
            .collect();
        let rows: Vec<Vec<&str>> = rows.iter().map(|r| r.iter().map(String::as_str).collect()).collect();
        let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
        let data = summary(&[("cat", Categorical), ("val", Numeric)], &rows);

        let (_, _, totals) = aggregate_categories(&data, &ChartConfig::default()).unwrap();
        assert_eq!(totals.len(), 8);
        assert_eq!(totals[0], CategoryTotal { category: "c0".to_string(), total: 3.0 });
        assert_eq!(totals[7].category, "c7");
    }

    #[test]
    fn test_bar_needs_category() {
        let data = summary(&[("a", Numeric), ("b", Numeric)], &[&["1", "2"]]);
        assert!(aggregate_categories(&data, &ChartConfig::default()).is_none());
    }

    #[test]
    fn test_bar_widths_and_heights() {
        let config = ChartConfig::default();
        let totals = vec![
            CategoryTotal { category: "a".to_string(), total: 10.0 },
            CategoryTotal { category: "b".to_string(), total: 5.0 },
            CategoryTotal { category: "c".to_string(), total: 0.0 },
            CategoryTotal { category: "d".to_string(), total: 2.5 },
        ];
        let geometry = layout_categories("cat", "val", &totals, &config);

        // slot = 480 / 4 = 120
        assert_eq!(geometry.bars[0].rect.width, 84.0);
        assert_eq!(geometry.bars[0].rect.x, 60.0 + 18.0);
        assert_eq!(geometry.bars[1].rect.x, 60.0 + 120.0 + 18.0);
        assert_eq!(geometry.bars[0].rect.height, 230.0);
        assert_eq!(geometry.bars[0].rect.y, 60.0);
        assert_eq!(geometry.bars[1].rect.height, 115.0);
        assert_eq!(geometry.bars[2].rect.height, 0.0);
        assert!(geometry.show_labels);
        assert_eq!(geometry.axes.x_ticks.len(), 4);
    }

    #[test]
    fn test_labels_hidden_for_many_bars() {
        let config = ChartConfig { max_bar_groups: 20, ..Default::default() };
        let totals: Vec<CategoryTotal> = (0..12)
            .map(|i| CategoryTotal { category: format!("c{}", i), total: i as f64 })
            .collect();
        let geometry = layout_categories("cat", "val", &totals, &config);

        assert!(!geometry.show_labels);
        assert!(geometry.axes.x_ticks.is_empty());
    }

    #[test]
    fn test_histogram_counts_every_numeric_value() {
        let data = summary(
            &[("v", Numeric)],
            &[&["1"], &["2"], &["2"], &["x"], &["9"], &["15"], &[""], &["4"]],
        );
        let (column, bins) = aggregate_histogram(&data, &ChartConfig::default()).unwrap();

        assert_eq!(column, "v");
        assert_eq!(bins.len(), 15);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 6);
        assert_eq!(bins[0].start, 1.0);
        assert_eq!(bins[14].count, 1);
    }

    #[test]
    fn test_histogram_single_value() {
        let data = summary(&[("v", Numeric)], &[&["5"], &["5"]]);
        let (_, bins) = aggregate_histogram(&data, &ChartConfig::default()).unwrap();

        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[0].end - bins[0].start, 1.0);
    }

    #[test]
    fn test_histogram_layout_is_contiguous() {
        let bins: Vec<HistogramBin> = (0..15)
            .map(|i| HistogramBin { start: i as f64, end: i as f64 + 1.0, count: i })
            .collect();
        let geometry = layout_histogram("v", &bins, &Canvas::default());

        // slot = 480 / 15 = 32
        assert_eq!(geometry.bars[1].rect.x - geometry.bars[0].rect.x, 32.0);
        assert_eq!(geometry.bars[0].rect.width, 31.0);
        assert_eq!(geometry.bars[14].rect.height, 230.0);
    }
}
