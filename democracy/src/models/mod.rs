//! Domain models for the Democracy Index pipeline.
//!
//! - [`IndexRecord`] - one country-year observation (long format)
//! - [`YearAverage`] / [`RegionAverage`] - derived yearly means
//! - [`RegimeCategory`] - ordinal regime band derived from the index
//! - [`ClassifiedRecord`] - a record with its re-derived category
//! - [`IndexChange`] - index difference between two years

pub mod regime;

use serde::{Deserialize, Serialize};

pub use regime::RegimeCategory;

// =============================================================================
// Index Record
// =============================================================================

/// One (country, year) observation.
///
/// `regime_type` is the label carried by the source table. It reflects the
/// latest edition only; use [`RegimeCategory::classify`] for a given year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexRecord {
    pub country: String,
    pub region: String,
    pub regime_type: String,
    pub year: i32,
    /// `None` when the source cell is blank.
    pub democracy_index: Option<f64>,
}

impl IndexRecord {
    /// Category for this record's own year, if it has an index value.
    pub fn regime(&self) -> Option<RegimeCategory> {
        self.democracy_index.map(RegimeCategory::classify)
    }
}

// =============================================================================
// Averages
// =============================================================================

/// World mean for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct YearAverage {
    pub year: i32,
    pub democracy_index: Option<f64>,
}

/// Mean over one region for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegionAverage {
    pub region: String,
    pub year: i32,
    pub democracy_index: Option<f64>,
}

// =============================================================================
// Classified Record
// =============================================================================

/// A record paired with the category derived from its own index value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedRecord<'a> {
    #[serde(flatten)]
    pub record: &'a IndexRecord,
    #[serde(rename = "Regime")]
    pub regime: RegimeCategory,
}

// =============================================================================
// Index Change
// =============================================================================

/// Index difference for one country between two years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexChange {
    pub country: String,
    pub region: String,
    pub start_year: i32,
    pub end_year: i32,
    pub start: Option<f64>,
    pub end: Option<f64>,
    /// `end - start`, when both are present.
    pub change: Option<f64>,
}

impl IndexChange {
    pub fn new(
        country: impl Into<String>,
        region: impl Into<String>,
        (start_year, start): (i32, Option<f64>),
        (end_year, end): (i32, Option<f64>),
    ) -> Self {
        let change = match (start, end) {
            (Some(s), Some(e)) => Some(e - s),
            _ => None,
        };
        Self {
            country: country.into(),
            region: region.into(),
            start_year,
            end_year,
            start,
            end,
            change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: Option<f64>) -> IndexRecord {
        IndexRecord {
            country: "Norway".into(),
            region: "Western Europe".into(),
            regime_type: "Full democracy".into(),
            year: 2023,
            democracy_index: index,
        }
    }

    #[test]
    fn test_record_regime() {
        assert_eq!(record(Some(9.81)).regime(), Some(RegimeCategory::FullDemocracy));
        assert_eq!(record(None).regime(), None);
    }

    #[test]
    fn test_record_serializes_pascal_case() {
        let json = serde_json::to_value(record(Some(9.81))).unwrap();
        assert_eq!(json["Country"], "Norway");
        assert_eq!(json["Year"], 2023);
        assert_eq!(json["DemocracyIndex"], 9.81);
        assert_eq!(json["RegimeType"], "Full democracy");
    }

    #[test]
    fn test_classified_record_flattens() {
        let r = record(Some(5.0));
        let classified = ClassifiedRecord { record: &r, regime: RegimeCategory::HybridRegime };
        let json = serde_json::to_value(classified).unwrap();
        assert_eq!(json["Country"], "Norway");
        assert_eq!(json["Regime"], "Hybrid regime");
    }

    #[test]
    fn test_index_change() {
        let change = IndexChange::new("Chile", "Latin America and the Caribbean", (2006, Some(7.89)), (2023, Some(7.98)));
        assert!((change.change.unwrap() - 0.09).abs() < 1e-9);

        let missing = IndexChange::new("Chile", "Latin America and the Caribbean", (2006, None), (2023, Some(7.98)));
        assert_eq!(missing.change, None);
    }
}
