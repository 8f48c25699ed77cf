//! Wide-to-long reshaping.
//!
//! ```text
//! Wide (one row per country)                 Long (one row per country-year)
//! ┌────────┬─────────┬─────┬──────┬──────┐   ┌─────────┬──────┬───────┐
//! │ Region │ Country │ ... │ 2023 │ 2022 │   │ Country │ Year │ Index │
//! ├────────┼─────────┼─────┼──────┼──────┤ → ├─────────┼──────┼───────┤
//! │ W. Eu. │ Norway  │ ... │ 9.81 │ 9.81 │   │ Norway  │ 2023 │ 9.81  │
//! └────────┴─────────┴─────┴──────┴──────┘   │ Norway  │ 2022 │ 9.81  │
//!                                            └─────────┴──────┴───────┘
//! ```
//!
//! Rank columns (`2023 rank`) are dropped first. Records come out
//! column-major: every country for the first year column, then the next.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{LoadError, LoadResult};
use crate::models::IndexRecord;
use crate::parser::{CsvError, ParseResult};

pub const REGION_COLUMN: &str = "Region";
pub const COUNTRY_COLUMN: &str = "Country";
pub const REGIME_COLUMN: &str = "RegimeType";

/// Source spellings of the static headers, mapped to their canonical name.
const HEADER_ALIASES: [(&str, &str); 2] = [("Regime type", REGIME_COLUMN), ("Regime Type", REGIME_COLUMN)];

/// Cells treated as a missing value.
const MISSING_MARKERS: [&str; 7] = ["", "-", "–", "—", "n/a", "na", "nan"];

static RANK_COLUMN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\srank\b").expect("valid rank regex"));

/// Canonical header name.
pub fn normalize_header(header: &str) -> String {
    let trimmed = header.trim();
    HEADER_ALIASES
        .iter()
        .find(|(from, _)| *from == trimmed)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Whether a header names a rank column.
pub fn is_rank_column(header: &str) -> bool {
    RANK_COLUMN.is_match(header)
}

/// Column layout of a wide table after normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct WideLayout {
    pub region: usize,
    pub country: usize,
    pub regime: usize,
    /// (column position, year) in header order
    pub years: Vec<(usize, i32)>,
    /// Headers dropped as rank columns
    pub dropped: Vec<String>,
}

impl WideLayout {
    /// Classify every header of the table.
    pub fn detect(headers: &[String]) -> LoadResult<Self> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let find = |name: &str| {
            normalized
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };

        let region = find(REGION_COLUMN)?;
        let country = find(COUNTRY_COLUMN)?;
        let regime = find(REGIME_COLUMN)?;

        let mut years = Vec::new();
        let mut dropped = Vec::new();

        for (idx, header) in normalized.iter().enumerate() {
            if idx == region || idx == country || idx == regime {
                continue;
            }
            if is_rank_column(header) {
                dropped.push(header.clone());
                continue;
            }
            let year = header
                .parse::<i32>()
                .map_err(|_| LoadError::InvalidYearColumn(header.clone()))?;
            years.push((idx, year));
        }

        if years.is_empty() {
            return Err(LoadError::NoYearColumns);
        }

        Ok(Self {
            region,
            country,
            regime,
            years,
            dropped,
        })
    }
}

/// Convert a wide table into one record per (country, year).
///
/// The output always holds `rows × year columns` records.
pub fn wide_to_long(table: &ParseResult) -> LoadResult<Vec<IndexRecord>> {
    let layout = WideLayout::detect(&table.headers)?;
    let mut records = Vec::with_capacity(table.rows.len() * layout.years.len());

    for &(col, year) in &layout.years {
        for (row_idx, row) in table.rows.iter().enumerate() {
            let cell = row.get(col).map(String::as_str).unwrap_or("");
            let democracy_index = parse_index(cell).map_err(|message| {
                CsvError::new(row_idx + 2, message)
                    .with_column(table.headers[col].clone())
                    .with_value(cell)
            })?;

            records.push(IndexRecord {
                country: row[layout.country].clone(),
                region: row[layout.region].clone(),
                regime_type: row[layout.regime].clone(),
                year,
                democracy_index,
            });
        }
    }

    Ok(records)
}

/// Parse an index cell. Missing markers give `None`.
pub fn parse_index(cell: &str) -> Result<Option<f64>, String> {
    let trimmed = cell.trim();
    if MISSING_MARKERS.iter().any(|m| m.eq_ignore_ascii_case(trimmed)) {
        return Ok(None);
    }

    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| "not a number".to_string())
}
