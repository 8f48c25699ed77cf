//! The canonical in-memory record set.
//!
//! A [`Dataset`] is built once from long-format records and never mutated.
//! Filters return borrowed views; aggregations are recomputed on demand.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::{LoadError, LoadResult, MatrixError, MatrixResult};
use crate::models::{ClassifiedRecord, IndexRecord, RegimeCategory, RegionAverage, YearAverage};

/// Immutable set of country-year records.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<IndexRecord>,
    years: BTreeSet<i32>,
}

impl Dataset {
    /// Build a dataset, rejecting duplicate (country, year) pairs.
    pub fn new(records: Vec<IndexRecord>) -> LoadResult<Self> {
        if let Some(dup) = first_duplicate(&records) {
            return Err(LoadError::DuplicateRecord {
                country: dup.country.clone(),
                year: dup.year,
            });
        }

        let years = records.iter().map(|r| r.year).collect();
        Ok(Self { records, years })
    }

    pub fn records(&self) -> &[IndexRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.iter().copied()
    }

    pub fn contains_year(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    /// Fail with a descriptive error when `year` has no data.
    pub fn require_year(&self, year: i32) -> MatrixResult<()> {
        if self.contains_year(year) {
            return Ok(());
        }
        Err(MatrixError::YearNotFound {
            year,
            available: self.year_range(),
        })
    }

    fn year_range(&self) -> String {
        match (self.years.first(), self.years.last()) {
            (Some(first), Some(last)) if first == last => first.to_string(),
            (Some(first), Some(last)) => format!("{}-{}", first, last),
            _ => "none".to_string(),
        }
    }

    /// Distinct regions in first-appearance order.
    pub fn regions(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.region.as_str()))
    }

    /// Distinct countries in first-appearance order.
    pub fn countries(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.country.as_str()))
    }

    // -------------------------------------------------------------------------
    // Filters
    // -------------------------------------------------------------------------

    pub fn filter_by_region(&self, regions: &[&str]) -> Vec<&IndexRecord> {
        self.filter(|r| regions.contains(&r.region.as_str()))
    }

    pub fn filter_by_country(&self, countries: &[&str]) -> Vec<&IndexRecord> {
        self.filter(|r| countries.contains(&r.country.as_str()))
    }

    /// Filter on the source regime label.
    pub fn filter_by_regime(&self, regimes: &[&str]) -> Vec<&IndexRecord> {
        self.filter(|r| regimes.contains(&r.regime_type.as_str()))
    }

    pub fn filter_by_year(&self, year: i32) -> Vec<&IndexRecord> {
        self.filter(|r| r.year == year)
    }

    fn filter<P>(&self, predicate: P) -> Vec<&IndexRecord>
    where
        P: Fn(&IndexRecord) -> bool,
    {
        self.records.iter().filter(|&r| predicate(r)).collect()
    }

    // -------------------------------------------------------------------------
    // Aggregations
    // -------------------------------------------------------------------------

    /// Mean index per year over all countries.
    pub fn world_average(&self) -> Vec<YearAverage> {
        world_average_of(self.records.iter())
    }

    /// Mean index per (region, year), ordered by region then year.
    pub fn region_averages(&self) -> Vec<RegionAverage> {
        region_averages_of(self.records.iter())
    }

    /// Records of one year with a category derived from that year's index.
    ///
    /// Records without an index value are skipped.
    pub fn classified_year(&self, year: i32) -> Vec<ClassifiedRecord<'_>> {
        self.records
            .iter()
            .filter(|r| r.year == year)
            .filter_map(|record| {
                record
                    .democracy_index
                    .map(|index| ClassifiedRecord { record, regime: RegimeCategory::classify(index) })
            })
            .collect()
    }
}

/// Running mean that ignores missing values.
#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Mean index per year over any view of records.
pub fn world_average_of<'a, I>(records: I) -> Vec<YearAverage>
where
    I: IntoIterator<Item = &'a IndexRecord>,
{
    let mut groups: BTreeMap<i32, Mean> = BTreeMap::new();
    for r in records {
        groups.entry(r.year).or_default().push(r.democracy_index);
    }

    groups
        .into_iter()
        .map(|(year, mean)| YearAverage {
            year,
            democracy_index: mean.value(),
        })
        .collect()
}

/// Mean index per (region, year) over any view of records.
pub fn region_averages_of<'a, I>(records: I) -> Vec<RegionAverage>
where
    I: IntoIterator<Item = &'a IndexRecord>,
{
    let mut groups: BTreeMap<(&str, i32), Mean> = BTreeMap::new();
    for r in records {
        groups
            .entry((r.region.as_str(), r.year))
            .or_default()
            .push(r.democracy_index);
    }

    groups
        .into_iter()
        .map(|((region, year), mean)| RegionAverage {
            region: region.to_string(),
            year,
            democracy_index: mean.value(),
        })
        .collect()
}

fn first_duplicate(records: &[IndexRecord]) -> Option<&IndexRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .iter()
        .find(|r| !seen.insert((r.country.as_str(), r.year)))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}
