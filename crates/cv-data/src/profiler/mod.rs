//! Column type inference over the leading chunk of a file

use ahash::AHashSet;
use csv::{ReaderBuilder, Terminator, Trim};
use cv_core::{CellValue, ColumnKind, ColumnProfile, DatasetSummary, Record};

use crate::config::ProfilerConfig;
use crate::DataError;

/// Parse a cell the way the profiler does: trimmed, non-empty, finite
pub fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Profile the leading bytes of a file of `file_size` bytes.
///
/// Only the first `chunk_size` bytes of `bytes` are looked at. When the file
/// is larger than that, the last line of the chunk is assumed to be cut and is
/// dropped before anything else happens.
pub fn profile(bytes: &[u8], file_size: u64, config: &ProfilerConfig) -> Result<DatasetSummary, DataError> {
    let chunk = &bytes[..bytes.len().min(config.chunk_size)];
    let text = String::from_utf8_lossy(chunk);
    if text.is_empty() {
        return Err(DataError::EmptyContent);
    }

    let truncated = file_size > config.chunk_size as u64;
    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if truncated {
        lines.pop();
    }
    lines.retain(|line| !line.trim().is_empty());

    if lines.len() < 2 {
        return Err(DataError::InsufficientRows { found: lines.len() });
    }

    let (headers, records) = split_lines(&lines)?;

    // Lines, not data rows, are extrapolated. Kept as is.
    let estimated_row_count = if truncated {
        ((file_size as f64 / config.chunk_size as f64) * lines.len() as f64).floor() as u64
    } else {
        (lines.len() - 1) as u64
    };

    let columns: Vec<ColumnProfile> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| profile_column(name, idx, &records, config))
        .collect();

    let rows: Vec<Record> = records
        .iter()
        .take(config.max_rows)
        .map(|record| {
            headers
                .iter()
                .enumerate()
                .map(|(idx, name)| (name.clone(), to_cell(cell(record, idx))))
                .collect()
        })
        .collect();

    tracing::debug!(
        "Profiled {} lines ({} bytes of {}): {} columns, {} rows kept, truncated: {}",
        lines.len(),
        chunk.len(),
        file_size,
        columns.len(),
        rows.len(),
        truncated
    );

    Ok(DatasetSummary {
        estimated_row_count,
        column_count: headers.len(),
        columns,
        rows,
    })
}

/// Split lines on plain commas. Quotes carry no meaning.
fn split_lines(lines: &[&str]) -> Result<(Vec<String>, Vec<Vec<String>>), DataError> {
    let body = lines.join("\n");
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .quoting(false)
        .flexible(true)
        .trim(Trim::All)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(body.as_bytes());

    let headers = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::with_capacity(lines.len() - 1);
    for result in reader.records() {
        let record = result?;
        records.push(record.iter().map(str::to_string).collect());
    }

    Ok((headers, records))
}

fn cell(record: &[String], idx: usize) -> &str {
    record.get(idx).map(String::as_str).unwrap_or("")
}

fn to_cell(value: &str) -> CellValue {
    match parse_number(value) {
        Some(v) => CellValue::Number(v),
        None => CellValue::Text(value.to_string()),
    }
}

fn profile_column(name: &str, idx: usize, records: &[Vec<String>], config: &ProfilerConfig) -> ColumnProfile {
    let probe = &records[..records.len().min(config.type_probe_rows)];
    let kind = if !probe.is_empty() && probe.iter().all(|r| parse_number(cell(r, idx)).is_some()) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    };

    let unique_count = records
        .iter()
        .take(config.unique_probe_rows)
        .map(|r| cell(r, idx))
        .collect::<AHashSet<_>>()
        .len();

    let sample_values = records
        .iter()
        .map(|r| cell(r, idx))
        .filter(|v| !v.is_empty())
        .take(config.max_sample_values)
        .map(str::to_string)
        .collect();

    ColumnProfile {
        name: name.to_string(),
        kind,
        unique_count,
        sample_values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn profile_str(text: &str) -> Result<DatasetSummary, DataError> {
        profile(text.as_bytes(), text.len() as u64, &ProfilerConfig::default())
    }

    #[test]
    fn test_small_file_is_counted_exactly() {
        let summary = profile_str("a,b\n1,x\n2,y\n3,z\n").unwrap();

        assert_eq!(summary.estimated_row_count, 3);
        assert_eq!(summary.column_count, 2);
        assert_eq!(summary.columns[0].kind, ColumnKind::Numeric);
        assert_eq!(summary.columns[1].kind, ColumnKind::Categorical);
        assert_eq!(summary.columns[1].sample_values, vec!["x", "y", "z"]);
        assert_eq!(summary.rows[0]["a"], CellValue::Number(1.0));
        assert_eq!(summary.rows[2]["b"], CellValue::Text("z".to_string()));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(profile_str(""), Err(DataError::EmptyContent)));
    }

    #[test]
    fn test_header_only_and_blank_lines() {
        assert!(matches!(
            profile_str("a,b\n\n   \n"),
            Err(DataError::InsufficientRows { found: 1 })
        ));
        assert!(matches!(
            profile_str("  \n\t\n"),
            Err(DataError::InsufficientRows { found: 0 })
        ));
    }

    #[test]
    fn test_blank_lines_and_crlf_are_ignored() {
        let summary = profile_str("name , score\r\n\r\nann, 3\r\n  \r\nbob,4\r\n").unwrap();

        assert_eq!(summary.columns[0].name, "name");
        assert_eq!(summary.columns[1].name, "score");
        assert_eq!(summary.estimated_row_count, 2);
        assert_eq!(summary.rows[1]["score"], CellValue::Number(4.0));
    }

    #[test]
    fn test_truncated_chunk_drops_last_line() {
        let config = ProfilerConfig { chunk_size: 10, ..Default::default() };
        let summary = profile(b"x,y\n1,2\n3,4\n5,6\n", 40, &config).unwrap();

        // "x,y\n1,2\n3," is read, "3," is dropped
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.estimated_row_count, 8);
    }

    #[test]
    fn test_extrapolation_counts_header_line() {
        let config = ProfilerConfig { chunk_size: 12, ..Default::default() };
        let summary = profile(b"x,y\n1,2\n3,4\n5,6\n", 48, &config).unwrap();

        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.estimated_row_count, 12);
    }

    #[test]
    fn test_type_probe_only_looks_at_first_rows() {
        let summary = profile_str("v,w\n1,1\n2,\n3,3\n4,4\n5,5\nabc,6\n").unwrap();

        assert_eq!(summary.columns[0].kind, ColumnKind::Numeric);
        assert_eq!(summary.columns[1].kind, ColumnKind::Categorical);
        assert_eq!(summary.rows[5]["v"], CellValue::Text("abc".to_string()));
        assert_eq!(summary.rows[1]["w"], CellValue::Text(String::new()));
    }

    #[test]
    fn test_quotes_are_not_special() {
        let summary = profile_str("city,pop\n\"Paris, FR\",2\n").unwrap();

        assert_eq!(summary.rows[0]["city"], CellValue::Text("\"Paris".to_string()));
        assert_eq!(summary.rows[0]["pop"], CellValue::Text("FR\"".to_string()));
    }

    #[test]
    fn test_infinite_cells_keep_column_categorical() {
        let summary = profile_str("a,b\n1,2\n2,4\ninf,6\n4,8\n5,9\n").unwrap();

        assert_eq!(summary.columns[0].kind, ColumnKind::Categorical);
        assert_eq!(summary.columns[1].kind, ColumnKind::Numeric);
        assert_eq!(summary.rows[2]["a"], CellValue::Text("inf".to_string()));
    }

    #[test]
    fn test_lone_carriage_return_stays_in_its_line() {
        let summary = profile_str("a,b\n1,x\ry\n2,z\n").unwrap();

        assert_eq!(summary.estimated_row_count, 2);
        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.rows[0]["b"], CellValue::Text("x\ry".to_string()));
        assert_eq!(summary.rows[1]["a"], CellValue::Number(2.0));
    }

    #[test]
    fn test_missing_cells_and_extra_cells() {
        let summary = profile_str("a,b,c\n1\n2,3,4,5\n").unwrap();

        assert_eq!(summary.rows[0]["c"], CellValue::Text(String::new()));
        assert_eq!(summary.rows[1].len(), 3);
    }

    #[test]
    fn test_row_and_uniqueness_caps() {
        let mut text = String::from("id,group\n");
        for i in 0..150 {
            text.push_str(&format!("{},{}\n", i, i % 4));
        }
        let summary = profile_str(&text).unwrap();

        assert_eq!(summary.rows.len(), 100);
        assert_eq!(summary.estimated_row_count, 150);
        assert_eq!(summary.columns[0].unique_count, 100);
        assert_eq!(summary.columns[1].unique_count, 4);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("-4"), Some(-4.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("-Infinity"), None);
        assert_eq!(parse_number("1e309"), None);
        assert_eq!(parse_number("12abc"), None);
    }

    proptest! {
        #[test]
        fn prop_columns_follow_header(
            headers in prop::collection::vec("[a-z]{1,6}", 1..8),
            rows in prop::collection::vec(prop::collection::vec(-1000i32..1000, 8), 1..160),
        ) {
            let mut text = headers.join(",");
            text.push('\n');
            for row in &rows {
                let cells: Vec<String> = row.iter().take(headers.len()).map(|v| v.to_string()).collect();
                text.push_str(&cells.join(","));
                text.push('\n');
            }

            let summary = profile_str(&text).unwrap();
            prop_assert_eq!(summary.column_count, headers.len());
            prop_assert_eq!(summary.columns.len(), headers.len());
            prop_assert!(summary.rows.len() <= 100);

            let again = profile_str(&text).unwrap();
            prop_assert_eq!(summary, again);
        }
    }
}
