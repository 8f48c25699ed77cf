//! High-level loading API.
//!
//! Combines parsing, reshaping and dataset construction, and logs progress.
//!
//! # Example
//!
//! ```rust,ignore
//! use democracy::transform::pipeline::load_dataset;
//! use std::path::Path;
//!
//! let loaded = load_dataset(Path::new("data/raw/democracy_index.csv"))?;
//! println!("{} records", loaded.dataset.len());
//! ```

use serde::Serialize;
use std::io::Write;
use std::path::Path;

use super::dataset::Dataset;
use super::reshape::{wide_to_long, WideLayout};
use crate::error::{LoadError, LoadResult, PipelineResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::IndexRecord;
use crate::parser::{parse_bytes_auto, parse_file_auto, CsvError, ParseResult};

/// CSV file information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
    pub years: Vec<i32>,
    pub dropped_columns: Vec<String>,
}

/// A dataset together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub csv_info: CsvInfo,
}

/// Load the wide CSV at `path` into a [`Dataset`].
pub fn load_dataset(path: &Path) -> PipelineResult<LoadedDataset> {
    log_info(format!("📖 Reading {}", path.display()));
    let parse_result = parse_file_auto(path).map_err(LoadError::from)?;
    load_parsed(parse_result)
}

/// Same as [`load_dataset`] for CSV bytes already in memory.
pub fn load_bytes(bytes: &[u8]) -> PipelineResult<LoadedDataset> {
    let parse_result = parse_bytes_auto(bytes).map_err(LoadError::from)?;
    load_parsed(parse_result)
}

/// Reshape an already-parsed wide table.
pub fn load_parsed(parse_result: ParseResult) -> PipelineResult<LoadedDataset> {
    log_success(format!("Detected encoding: {}", parse_result.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(parse_result.delimiter)));
    log_success(format!("Read {} countries", parse_result.rows.len()));

    let layout = WideLayout::detect(&parse_result.headers)?;
    if !layout.dropped.is_empty() {
        log_info_indent(format!("Dropped rank columns: {}", layout.dropped.join(", ")), 1);
    }

    let records = wide_to_long(&parse_result)?;
    let missing = records.iter().filter(|r| r.democracy_index.is_none()).count();
    if missing > 0 {
        log_warning(format!("{} country-years have no index value", missing));
    }

    let dataset = Dataset::new(records)?;
    log_success(format!(
        "{} records ({} countries × {} years)",
        dataset.len(),
        parse_result.rows.len(),
        layout.years.len()
    ));

    let csv_info = CsvInfo {
        encoding: parse_result.encoding,
        delimiter: parse_result.delimiter,
        headers: parse_result.headers,
        row_count: parse_result.rows.len(),
        years: layout.years.iter().map(|(_, y)| *y).collect(),
        dropped_columns: layout.dropped,
    };

    Ok(LoadedDataset { dataset, csv_info })
}

/// Write records in long format: `Country,Region,RegimeType,Year,DemocracyIndex`.
pub fn write_long_csv<'a, W, I>(records: I, writer: W) -> LoadResult<()>
where
    W: Write,
    I: IntoIterator<Item = &'a IndexRecord>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record).map_err(|e| CsvError::new(0, e.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Format delimiter for display
fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    const WIDE: &str = "\
Region,Country,Regime type,2023 rank,2023,2022
North America,Canada,Full democracy,13,8.69,8.88
North America,United States,Flawed democracy,29,7.85,7.85
Western Europe,Norway,Full democracy,1,9.81,9.81
";

    #[test]
    fn test_load_bytes() {
        let loaded = load_bytes(WIDE.as_bytes()).unwrap();

        assert_eq!(loaded.dataset.len(), 6);
        assert_eq!(loaded.csv_info.row_count, 3);
        assert_eq!(loaded.csv_info.years, vec![2023, 2022]);
        assert_eq!(loaded.csv_info.dropped_columns, vec!["2023 rank"]);
        assert_eq!(loaded.csv_info.delimiter, ',');
    }

    #[test]
    fn test_load_dataset_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("democracy_index.csv");
        std::fs::write(&path, WIDE).unwrap();

        let loaded = load_dataset(&path).unwrap();
        assert_eq!(loaded.dataset.countries(), vec!["Canada", "United States", "Norway"]);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = load_dataset(Path::new("/nonexistent/democracy.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Load(LoadError::Csv(_))));
    }

    #[test]
    fn test_write_long_csv() {
        let loaded = load_bytes(WIDE.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_long_csv(loaded.dataset.records(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Country,Region,RegimeType,Year,DemocracyIndex"));
        assert_eq!(lines.next(), Some("Canada,North America,Full democracy,2023,8.69"));
        assert_eq!(text.lines().count(), 7);
    }
}
