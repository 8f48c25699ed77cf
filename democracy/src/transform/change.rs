//! Index change between two years.

use std::collections::HashMap;

use super::dataset::Dataset;
use crate::error::MatrixResult;
use crate::models::{IndexChange, IndexRecord};

/// Per-country index change from `start_year` to `end_year`.
///
/// Countries are matched by name. A country present in only one of the two
/// years still appears, with a `None` change. Output follows the end year's
/// record order, then countries only seen in the start year.
pub fn index_changes(dataset: &Dataset, start_year: i32, end_year: i32) -> MatrixResult<Vec<IndexChange>> {
    dataset.require_year(start_year)?;
    dataset.require_year(end_year)?;

    let start: HashMap<&str, &IndexRecord> = dataset
        .filter_by_year(start_year)
        .into_iter()
        .map(|r| (r.country.as_str(), r))
        .collect();

    let end_records = dataset.filter_by_year(end_year);
    let mut changes = Vec::with_capacity(end_records.len());

    for end in &end_records {
        let start_value = start.get(end.country.as_str()).and_then(|r| r.democracy_index);
        changes.push(IndexChange::new(
            end.country.as_str(),
            end.region.as_str(),
            (start_year, start_value),
            (end_year, end.democracy_index),
        ));
    }

    for r in dataset.filter_by_year(start_year) {
        if !end_records.iter().any(|e| e.country == r.country) {
            changes.push(IndexChange::new(
                r.country.as_str(),
                r.region.as_str(),
                (start_year, r.democracy_index),
                (end_year, None),
            ));
        }
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatrixError;

    fn record(country: &str, year: i32, index: Option<f64>) -> IndexRecord {
        IndexRecord {
            country: country.into(),
            region: "Region".into(),
            regime_type: "Hybrid regime".into(),
            year,
            democracy_index: index,
        }
    }

    #[test]
    fn test_changes_joined_by_country() {
        let data = Dataset::new(vec![
            record("A", 2006, Some(5.0)),
            record("B", 2006, Some(7.0)),
            record("B", 2023, Some(6.5)),
            record("A", 2023, Some(5.5)),
        ])
        .unwrap();

        let changes = index_changes(&data, 2006, 2023).unwrap();

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].country, "B");
        assert!((changes[0].change.unwrap() + 0.5).abs() < 1e-9);
        assert_eq!(changes[1].country, "A");
        assert!((changes[1].change.unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_country_missing_in_one_year() {
        let data = Dataset::new(vec![
            record("A", 2006, Some(5.0)),
            record("Gone", 2006, Some(3.0)),
            record("A", 2023, Some(5.5)),
            record("New", 2023, Some(4.0)),
        ])
        .unwrap();

        let changes = index_changes(&data, 2006, 2023).unwrap();

        assert_eq!(changes.len(), 3);
        let new = changes.iter().find(|c| c.country == "New").unwrap();
        assert_eq!(new.start, None);
        assert_eq!(new.change, None);
        let gone = changes.iter().find(|c| c.country == "Gone").unwrap();
        assert_eq!(gone.end, None);
    }

    #[test]
    fn test_absent_year() {
        let data = Dataset::new(vec![record("A", 2006, Some(5.0))]).unwrap();
        let err = index_changes(&data, 2006, 2023).unwrap_err();
        assert!(matches!(err, MatrixError::YearNotFound { year: 2023, .. }));
    }
}
