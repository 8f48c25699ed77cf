//! Joining boundaries to index data.
//!
//! The join is left-outer from the boundary side: every boundary except
//! Antarctica yields exactly one row, carrying its matched value or `None`.
//! Boundary names go through [`alias::resolve`](super::alias::resolve)
//! before the exact-name match.
//!
//! Index countries that no boundary claims are reported. In strict mode
//! they are an error, minus any configured exemptions (micro-states are
//! absent from 1:110m boundaries).

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::alias::{resolve, ANTARCTICA};
use super::boundaries::CountryBoundary;
use crate::error::{JoinError, PipelineResult};
use crate::logs::{log_success, log_warning};
use crate::models::{IndexChange, IndexRecord, RegimeCategory};
use crate::transform::Dataset;

/// A boundary with the value joined to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined<'a, T> {
    pub boundary: &'a CountryBoundary,
    /// Boundary name after alias mapping
    pub country: &'a str,
    pub value: Option<&'a T>,
}

/// A boundary joined to one year's record.
pub type GeoRecord<'a> = Joined<'a, IndexRecord>;

/// A boundary joined to an index change.
pub type ChangeGeoRecord<'a> = Joined<'a, IndexChange>;

impl GeoRecord<'_> {
    /// Category re-derived from this year's index.
    pub fn regime(&self) -> Option<RegimeCategory> {
        self.value.and_then(IndexRecord::regime)
    }
}

/// Names left over on either side of a join.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JoinReport {
    /// Boundaries (alias-mapped) with no index value
    pub unmatched_boundaries: Vec<String>,
    /// Index countries with no boundary
    pub unmatched_countries: Vec<String>,
}

/// Result of a join.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJoin<'a, T> {
    pub rows: Vec<Joined<'a, T>>,
    pub report: JoinReport,
}

/// Join configuration.
#[derive(Debug, Clone, Default)]
pub struct GeoJoiner {
    strict: bool,
    exempt: HashSet<String>,
}

impl GeoJoiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail when an index country has no boundary.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Countries allowed to be missing from the boundaries in strict mode.
    pub fn exempt<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exempt.extend(countries.into_iter().map(Into::into));
        self
    }

    /// Join one year of the dataset onto the boundaries.
    pub fn join_year<'a>(
        &self,
        boundaries: &'a [CountryBoundary],
        dataset: &'a Dataset,
        year: i32,
    ) -> PipelineResult<GeoJoin<'a, IndexRecord>> {
        dataset.require_year(year)?;
        let records = dataset.filter_by_year(year);
        self.join(boundaries, records, |r| r.country.as_str())
    }

    /// Join index changes onto the boundaries.
    pub fn join_changes<'a>(
        &self,
        boundaries: &'a [CountryBoundary],
        changes: &'a [IndexChange],
    ) -> PipelineResult<GeoJoin<'a, IndexChange>> {
        self.join(boundaries, changes, |c| c.country.as_str())
    }

    /// Left join of `items` onto `boundaries` by country name.
    pub fn join<'a, T, I, K>(
        &self,
        boundaries: &'a [CountryBoundary],
        items: I,
        key: K,
    ) -> PipelineResult<GeoJoin<'a, T>>
    where
        I: IntoIterator<Item = &'a T>,
        K: Fn(&'a T) -> &'a str,
        T: 'a,
    {
        let items: Vec<&'a T> = items.into_iter().collect();
        let by_name: HashMap<&str, &'a T> = items.iter().map(|&item| (key(item), item)).collect();

        let mut rows = Vec::with_capacity(boundaries.len());
        let mut claimed: HashSet<&str> = HashSet::new();
        let mut report = JoinReport::default();

        for boundary in boundaries.iter().filter(|b| b.name != ANTARCTICA) {
            let country = resolve(&boundary.name);
            let value = by_name.get(country).copied();
            if value.is_some() {
                claimed.insert(country);
            } else {
                report.unmatched_boundaries.push(country.to_string());
            }
            rows.push(Joined { boundary, country, value });
        }

        report.unmatched_countries = items
            .iter()
            .map(|&item| key(item))
            .filter(|name| !claimed.contains(name))
            .map(str::to_string)
            .collect();

        self.check(&report)?;

        log_success(format!(
            "Joined {} boundaries ({} without data)",
            rows.len(),
            report.unmatched_boundaries.len()
        ));
        Ok(GeoJoin { rows, report })
    }

    fn check(&self, report: &JoinReport) -> Result<(), JoinError> {
        let missing: Vec<String> = report
            .unmatched_countries
            .iter()
            .filter(|name| !self.exempt.contains(name.as_str()))
            .cloned()
            .collect();

        if missing.is_empty() {
            return Ok(());
        }
        if self.strict {
            return Err(JoinError::UnmatchedCountries(missing));
        }
        log_warning(format!("{} countries have no boundary: {}", missing.len(), missing.join(", ")));
        Ok(())
    }
}
