//! Dataset summary produced by the profiler and consumed by the chart engine

use std::fmt;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single sampled cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// The numeric value, if the cell parsed as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Number(_) => None,
            CellValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// One sampled row, keyed by column name in header order
pub type Record = IndexMap<String, CellValue>;

/// Inferred kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Per-column metadata derived once per upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    /// Distinct trimmed values over the probed rows
    pub unique_count: usize,
    /// A few example values for display
    pub sample_values: Vec<String>,
}

impl ColumnProfile {
    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }
}

/// Result of profiling the leading chunk of a file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Exact when the file fit in one chunk, extrapolated otherwise
    pub estimated_row_count: u64,
    pub column_count: usize,
    pub columns: Vec<ColumnProfile>,
    pub rows: Vec<Record>,
}

impl DatasetSummary {
    /// Numeric columns in header order
    pub fn numeric_columns(&self) -> impl Iterator<Item = &ColumnProfile> {
        self.columns.iter().filter(|c| c.kind == ColumnKind::Numeric)
    }

    /// Categorical columns in header order
    pub fn categorical_columns(&self) -> impl Iterator<Item = &ColumnProfile> {
        self.columns.iter().filter(|c| c.kind == ColumnKind::Categorical)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric cells of a column, in row order
    pub fn numeric_values(&self, column: &str) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.get(column).and_then(CellValue::as_number))
            .collect()
    }
}
