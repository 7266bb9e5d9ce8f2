//! Code snippets for reproducing a chart outside the application
//!
//! Every chart type has a ggplot2 template for R and a pandas/seaborn
//! template for Python. The column names the chart engine would pick for the
//! dataset are substituted in, with generic placeholders when a column of the
//! needed kind does not exist.

use serde::Serialize;
use tracing::debug;
use cv_core::{ChartType, DatasetSummary};

/// File name used in the generated `read.csv` / `read_csv` calls
pub const DATA_FILE: &str = "data.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSnippets {
    pub r: String,
    pub python: String,
}

/// Columns the engine selects, or placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
struct Columns {
    value: String,
    second: String,
    category: String,
    numeric: Vec<String>,
    /// `None` when no grouping column exists
    group: Option<String>,
}

impl Columns {
    fn pick(summary: &DatasetSummary, heatmap_columns: usize) -> Self {
        let numeric: Vec<String> = summary.numeric_columns().map(|c| c.name.clone()).collect();
        let group = summary.categorical_columns().next().map(|c| c.name.clone());

        let second = numeric.get(1).cloned().unwrap_or_else(|| {
            if summary.column("date").is_some() {
                "date".to_string()
            } else {
                "x".to_string()
            }
        });

        Self {
            value: numeric.first().cloned().unwrap_or_else(|| "value".to_string()),
            second,
            category: group.clone().unwrap_or_else(|| "category".to_string()),
            numeric: numeric.into_iter().take(heatmap_columns).collect(),
            group,
        }
    }
}

/// Backtick-quoted R identifier
fn r_name(name: &str) -> String {
    format!("`{}`", name.replace('`', "\\`"))
}

/// Double-quoted Python string literal
fn py_str(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Snippets for `chart_type` with the dataset's columns filled in.
///
/// `heatmap_columns` must match the engine's cap so the correlation snippet
/// lists the same columns as the drawn heatmap.
pub fn snippets(chart_type: ChartType, summary: &DatasetSummary, heatmap_columns: usize) -> CodeSnippets {
    let cols = Columns::pick(summary, heatmap_columns);
    debug!(chart = %chart_type, value = %cols.value, "Generating code snippets");

    let CodeSnippets { r, python } = body(chart_type, &cols);
    CodeSnippets {
        r: format!("library(ggplot2)\n\ndf <- read.csv(\"{}\")\n\n{}", DATA_FILE, r),
        python: format!(
            "import pandas as pd\nimport matplotlib.pyplot as plt\nimport seaborn as sns\n\ndf = pd.read_csv(\"{}\")\n\n{}\nplt.show()\n",
            DATA_FILE, python
        ),
    }
}

fn body(chart_type: ChartType, cols: &Columns) -> CodeSnippets {
    let (v, s, c) = (&cols.value, &cols.second, &cols.category);
    // box, violin and ridgeline fall back to a single unnamed group
    let (r_group, py_group) = match &cols.group {
        Some(g) => (r_name(g), format!("x={}, ", py_str(g))),
        None => ("\"All\"".to_string(), String::new()),
    };

    match chart_type {
        ChartType::Bar => CodeSnippets {
            r: format!(
                "ggplot(df, aes(x = {}, y = {})) +\n  geom_col(fill = \"#6366f1\") +\n  theme_minimal()\n",
                r_name(c),
                r_name(v)
            ),
            python: format!(
                "totals = df.groupby({}, sort=False)[{}].sum().head(8)\ntotals.plot(kind=\"bar\", color=\"#6366f1\")\nplt.ylabel(\"Sum of {}\")\n",
                py_str(c),
                py_str(v),
                v
            ),
        },
        ChartType::Histogram => CodeSnippets {
            r: format!("ggplot(df, aes(x = {})) +\n  geom_histogram(bins = 15, fill = \"#6366f1\") +\n  theme_minimal()\n", r_name(v)),
            python: format!("sns.histplot(data=df, x={}, bins=15)\n", py_str(v)),
        },
        ChartType::Line => CodeSnippets {
            r: format!("ggplot(df, aes(x = {}, y = {})) +\n  geom_line(color = \"#6366f1\") +\n  theme_minimal()\n", r_name(s), r_name(v)),
            python: format!("sns.lineplot(data=df.head(50), x={}, y={})\n", py_str(s), py_str(v)),
        },
        ChartType::Area => CodeSnippets {
            r: format!(
                "ggplot(df, aes(x = {}, y = {})) +\n  geom_area(fill = \"#6366f1\", alpha = 0.3) +\n  geom_line(color = \"#6366f1\") +\n  theme_minimal()\n",
                r_name(s),
                r_name(v)
            ),
            python: format!(
                "subset = df.head(50)\nplt.fill_between(subset[{s}], subset[{v}], alpha=0.3)\nplt.plot(subset[{s}], subset[{v}])\n",
                s = py_str(s),
                v = py_str(v)
            ),
        },
        ChartType::Scatter => CodeSnippets {
            r: format!("ggplot(df, aes(x = {}, y = {})) +\n  geom_point(alpha = 0.7) +\n  theme_minimal()\n", r_name(v), r_name(s)),
            python: format!("sns.scatterplot(data=df, x={}, y={}, alpha=0.7)\n", py_str(v), py_str(s)),
        },
        ChartType::Box => CodeSnippets {
            r: format!("ggplot(df, aes(x = {}, y = {})) +\n  geom_boxplot() +\n  theme_minimal()\n", r_group, r_name(v)),
            python: format!("sns.boxplot(data=df, {}y={})\n", py_group, py_str(v)),
        },
        ChartType::Violin => CodeSnippets {
            r: format!("ggplot(df, aes(x = {}, y = {})) +\n  geom_violin(fill = \"#6366f1\", alpha = 0.6) +\n  theme_minimal()\n", r_group, r_name(v)),
            python: format!("sns.violinplot(data=df, {}y={})\n", py_group, py_str(v)),
        },
        ChartType::Density => CodeSnippets {
            r: format!("ggplot(df, aes(x = {})) +\n  geom_density(fill = \"#6366f1\", alpha = 0.3) +\n  theme_minimal()\n", r_name(v)),
            python: format!("sns.kdeplot(data=df, x={}, fill=True)\n", py_str(v)),
        },
        ChartType::Ridgeline => CodeSnippets {
            r: format!(
                "library(ggridges)\n\nggplot(df, aes(x = {}, y = {}, fill = {})) +\n  geom_density_ridges(alpha = 0.7) +\n  theme_minimal()\n",
                r_name(v),
                r_group,
                r_group
            ),
            python: match &cols.group {
                Some(g) => format!(
                    "grid = sns.FacetGrid(df, row={g}, hue={g}, aspect=6, height=1.2)\ngrid.map(sns.kdeplot, {v}, fill=True, alpha=0.7)\ngrid.figure.subplots_adjust(hspace=-0.3)\n",
                    g = py_str(g),
                    v = py_str(v)
                ),
                None => format!("sns.kdeplot(data=df, x={}, fill=True, alpha=0.7)\n", py_str(v)),
            },
        },
        ChartType::Heatmap => {
            let numeric = if cols.numeric.len() >= 2 {
                cols.numeric.clone()
            } else {
                vec![v.clone(), s.clone()]
            };
            let r_cols = numeric.iter().map(|n| format!("\"{}\"", n)).collect::<Vec<_>>().join(", ");
            let py_cols = numeric.iter().map(|n| py_str(n)).collect::<Vec<_>>().join(", ");
            CodeSnippets {
                r: format!(
                    "corr <- cor(df[, c({})], use = \"pairwise.complete.obs\")\ncorr_long <- as.data.frame(as.table(corr))\n\nggplot(corr_long, aes(Var1, Var2, fill = Freq)) +\n  geom_tile() +\n  geom_text(aes(label = sprintf(\"%.2f\", Freq))) +\n  scale_fill_gradient2(low = \"#ef4444\", high = \"#3b82f6\", limits = c(-1, 1)) +\n  theme_minimal()\n",
                    r_cols
                ),
                python: format!(
                    "corr = df[[{}]].corr()\nsns.heatmap(corr, annot=True, fmt=\".2f\", cmap=\"RdBu\", vmin=-1, vmax=1)\n",
                    py_cols
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::{ColumnKind, ColumnProfile};

    fn dataset(columns: &[(&str, ColumnKind)]) -> DatasetSummary {
        DatasetSummary {
            estimated_row_count: 0,
            column_count: columns.len(),
            columns: columns
                .iter()
                .map(|(name, kind)| ColumnProfile {
                    name: name.to_string(),
                    kind: *kind,
                    unique_count: 0,
                    sample_values: Vec::new(),
                })
                .collect(),
            rows: Vec::new(),
        }
    }

    #[test]
    fn test_columns_substituted() {
        let data = dataset(&[("region", ColumnKind::Categorical), ("sales", ColumnKind::Numeric)]);
        let code = snippets(ChartType::Bar, &data, 6);

        assert!(code.r.contains("aes(x = `region`, y = `sales`)"));
        assert!(code.python.contains("df.groupby(\"region\", sort=False)[\"sales\"]"));
        assert!(code.python.ends_with("plt.show()\n"));
    }

    #[test]
    fn test_placeholders_without_columns() {
        let code = snippets(ChartType::Scatter, &dataset(&[]), 6);
        assert!(code.r.contains("aes(x = `value`, y = `x`)"));
    }

    #[test]
    fn test_box_without_category_uses_single_group() {
        let data = dataset(&[("v", ColumnKind::Numeric)]);
        let code = snippets(ChartType::Box, &data, 6);

        assert!(code.r.contains("aes(x = \"All\", y = `v`)"));
        assert!(code.python.contains("sns.boxplot(data=df, y=\"v\")"));
    }

    #[test]
    fn test_heatmap_lists_numeric_columns() {
        let data = dataset(&[
            ("a", ColumnKind::Numeric),
            ("g", ColumnKind::Categorical),
            ("b", ColumnKind::Numeric),
            ("c", ColumnKind::Numeric),
        ]);
        let code = snippets(ChartType::Heatmap, &data, 6);

        assert!(code.r.contains("c(\"a\", \"b\", \"c\")"));
        assert!(code.python.contains("df[[\"a\", \"b\", \"c\"]].corr()"));
    }

    #[test]
    fn test_heatmap_respects_column_cap() {
        let data = dataset(&[
            ("a", ColumnKind::Numeric),
            ("b", ColumnKind::Numeric),
            ("c", ColumnKind::Numeric),
        ]);
        let code = snippets(ChartType::Heatmap, &data, 2);

        assert!(code.r.contains("c(\"a\", \"b\")"));
        assert!(code.python.contains("df[[\"a\", \"b\"]].corr()"));
    }

    #[test]
    fn test_every_type_has_both_languages() {
        let data = dataset(&[("g", ColumnKind::Categorical), ("v", ColumnKind::Numeric), ("w", ColumnKind::Numeric)]);
        for chart_type in ChartType::ALL {
            let code = snippets(chart_type, &data, 6);
            assert!(code.r.starts_with("library(ggplot2)"), "{}", chart_type);
            assert!(code.python.contains("pd.read_csv(\"data.csv\")"), "{}", chart_type);
        }
    }

    #[test]
    fn test_quoting() {
        assert_eq!(py_str("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(r_name("unit price"), "`unit price`");
    }
}
