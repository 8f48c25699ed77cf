//! Regime transition matrices.
//!
//! Cross-tabulates each country's regime category at a start year against
//! its category at an end year:
//!
//! ```text
//!                   end: Auth  Hybrid  Flawed  Full  Total
//! start: Auth            52      5       0      0     57
//!        Hybrid           4     26       6      0     36
//!        Flawed           0      4      38      3     45
//!        Full             0      0       2     20     22
//!        Total           56     35      46     23     NaN
//! ```
//!
//! Countries are matched by name across the two years. A country counts only
//! when it has an index value in both.

use serde::Serialize;
use std::collections::HashMap;

use super::dataset::Dataset;
use crate::error::MatrixResult;
use crate::models::RegimeCategory;

const N: usize = RegimeCategory::ALL.len();

/// Row/column label of the totals.
pub const TOTAL_LABEL: &str = "Total";

/// Counts of regime changes between two years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionMatrix {
    pub start_year: i32,
    pub end_year: i32,
    /// `counts[from][to]`, indexed by [`RegimeCategory::index`]
    pub counts: [[u32; N]; N],
}

impl TransitionMatrix {
    /// Build the matrix for two years of the dataset.
    ///
    /// Both years must exist; a missing year is an error rather than an
    /// all-zero matrix.
    pub fn build(dataset: &Dataset, start_year: i32, end_year: i32) -> MatrixResult<Self> {
        dataset.require_year(start_year)?;
        dataset.require_year(end_year)?;

        let start: HashMap<&str, RegimeCategory> = dataset
            .classified_year(start_year)
            .into_iter()
            .map(|c| (c.record.country.as_str(), c.regime))
            .collect();

        let mut matrix = Self {
            start_year,
            end_year,
            counts: [[0; N]; N],
        };

        for end in dataset.classified_year(end_year) {
            if let Some(from) = start.get(end.record.country.as_str()) {
                matrix.counts[from.index()][end.regime.index()] += 1;
            }
        }

        Ok(matrix)
    }

    pub fn count(&self, from: RegimeCategory, to: RegimeCategory) -> u32 {
        self.counts[from.index()][to.index()]
    }

    /// Countries that started in category `i`.
    pub fn row_total(&self, i: usize) -> u32 {
        self.counts[i].iter().sum()
    }

    /// Countries that ended in category `j`.
    pub fn column_total(&self, j: usize) -> u32 {
        self.counts.iter().map(|row| row[j]).sum()
    }

    /// Countries classified in both years.
    pub fn total(&self) -> u32 {
        self.counts.iter().flatten().sum()
    }

    /// Countries whose category did not change.
    pub fn unchanged(&self) -> u32 {
        (0..N).map(|i| self.counts[i][i]).sum()
    }

    /// The 5×5 table with a "Total" row and column.
    ///
    /// The bottom-right corner is `NaN`: it is not defined.
    pub fn grid(&self) -> [[f64; N + 1]; N + 1] {
        let mut grid = [[0.0; N + 1]; N + 1];
        for i in 0..N {
            for j in 0..N {
                grid[i][j] = f64::from(self.counts[i][j]);
            }
            grid[i][N] = f64::from(self.row_total(i));
            grid[N][i] = f64::from(self.column_total(i));
        }
        grid[N][N] = f64::NAN;
        grid
    }

    /// Axis labels, categories first then "Total".
    pub fn labels() -> [&'static str; N + 1] {
        let mut labels = [TOTAL_LABEL; N + 1];
        for (slot, category) in labels.iter_mut().zip(RegimeCategory::ALL) {
            *slot = category.label();
        }
        labels
    }

    /// Plain-text rendering for terminals.
    pub fn to_table(&self) -> String {
        let labels = Self::labels();
        let width = labels.iter().map(|l| l.len()).max().unwrap_or(0) + 2;
        let grid = self.grid();

        let mut out = format!("{:<width$}", format!("{} \\ {}", self.start_year, self.end_year));
        for label in labels {
            out.push_str(&format!("{:>width$}", label));
        }
        out.push('\n');

        for (label, row) in labels.iter().zip(grid.iter()) {
            out.push_str(&format!("{:<width$}", label));
            for value in row {
                let cell = if value.is_nan() { "-".to_string() } else { format!("{}", value) };
                out.push_str(&format!("{:>width$}", cell));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatrixError;
    use crate::models::IndexRecord;

    fn record(country: &str, year: i32, index: Option<f64>) -> IndexRecord {
        IndexRecord {
            country: country.into(),
            region: "Region".into(),
            regime_type: "Full democracy".into(),
            year,
            democracy_index: index,
        }
    }

    fn sample() -> Dataset {
        Dataset::new(vec![
            record("A", 2006, Some(9.0)),
            record("B", 2006, Some(7.0)),
            record("C", 2006, Some(5.0)),
            record("D", 2006, Some(2.0)),
            record("E", 2006, None),
            // end year listed in a different order
            record("D", 2023, Some(4.5)),
            record("C", 2023, Some(5.5)),
            record("A", 2023, Some(7.9)),
            record("B", 2023, Some(8.0)),
            record("E", 2023, Some(3.0)),
        ])
        .unwrap()
    }

    #[test]
    fn test_counts_match_by_country() {
        let m = TransitionMatrix::build(&sample(), 2006, 2023).unwrap();

        assert_eq!(m.count(RegimeCategory::FullDemocracy, RegimeCategory::FlawedDemocracy), 1);
        assert_eq!(m.count(RegimeCategory::FlawedDemocracy, RegimeCategory::FullDemocracy), 1);
        assert_eq!(m.count(RegimeCategory::HybridRegime, RegimeCategory::HybridRegime), 1);
        assert_eq!(m.count(RegimeCategory::Authoritarian, RegimeCategory::HybridRegime), 1);
        assert_eq!(m.unchanged(), 1);
    }

    #[test]
    fn test_total_counts_countries_valid_in_both_years() {
        let m = TransitionMatrix::build(&sample(), 2006, 2023).unwrap();
        // E has no 2006 value
        assert_eq!(m.total(), 4);
    }

    #[test]
    fn test_marginals_and_nan_corner() {
        let m = TransitionMatrix::build(&sample(), 2006, 2023).unwrap();
        let grid = m.grid();

        for i in 0..4 {
            let row_sum: f64 = grid[i][..4].iter().sum();
            assert_eq!(grid[i][4], row_sum);
            let col_sum: f64 = (0..4).map(|r| grid[r][i]).sum();
            assert_eq!(grid[4][i], col_sum);
        }
        assert!(grid[4][4].is_nan());
        let block: f64 = grid[..4].iter().map(|r| r[..4].iter().sum::<f64>()).sum();
        assert_eq!(block, f64::from(m.total()));
    }

    #[test]
    fn test_absent_year_is_error() {
        let err = TransitionMatrix::build(&sample(), 2006, 2030).unwrap_err();
        assert!(matches!(err, MatrixError::YearNotFound { year: 2030, .. }));
    }

    #[test]
    fn test_same_year_is_diagonal() {
        let m = TransitionMatrix::build(&sample(), 2023, 2023).unwrap();
        assert_eq!(m.unchanged(), m.total());
        assert_eq!(m.total(), 5);
    }

    #[test]
    fn test_labels_and_table() {
        assert_eq!(
            TransitionMatrix::labels(),
            ["Authoritarian", "Hybrid regime", "Flawed democracy", "Full democracy", "Total"]
        );
        let table = TransitionMatrix::build(&sample(), 2006, 2023).unwrap().to_table();
        assert!(table.starts_with("2006 \\ 2023"));
        assert_eq!(table.lines().count(), 6);
    }

    #[test]
    fn test_serializes_counts() {
        let m = TransitionMatrix::build(&sample(), 2006, 2023).unwrap();
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["start_year"], 2006);
        assert_eq!(json["counts"][3][2], 1);
    }
}
