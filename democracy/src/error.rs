//! Error types for the Democracy Index pipeline.
//!
//! One error enum per stage:
//!
//! - [`LoadError`] - reading and reshaping the wide CSV
//! - [`GeoError`] - reading country boundaries
//! - [`JoinError`] - reconciling boundary names with index countries
//! - [`MatrixError`] - year validation for transitions and index changes
//! - [`ScrapeError`] - fetching the source table
//! - [`ColorError`] - colour helpers
//! - [`PipelineError`] - top-level wrapper
//!
//! Stage errors convert into [`PipelineError`] via `From`, so `?` works
//! across stage boundaries.

use thiserror::Error;

use crate::parser::CsvError;

// =============================================================================
// Loading Errors
// =============================================================================

/// Errors while loading the wide democracy-index table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV content.
    #[error("{0}")]
    Csv(#[from] CsvError),

    /// A required static column is missing.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A header that is neither static, a rank column, nor a year.
    #[error("Column '{0}' is not a year")]
    InvalidYearColumn(String),

    /// No year columns left after dropping rank columns.
    #[error("No year columns found")]
    NoYearColumns,

    /// The same (country, year) pair appears twice.
    #[error("Duplicate record for {country} in {year}")]
    DuplicateRecord { country: String, year: i32 },
}

// =============================================================================
// Geometry Errors
// =============================================================================

/// Errors while loading country boundaries.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Failed to read file.
    #[error("Failed to read boundaries: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid GeoJSON document.
    #[error("Invalid GeoJSON: {0}")]
    Parse(String),

    /// A feature carries no country name property.
    #[error("Feature {0} has no NAME property")]
    MissingName(usize),

    /// A feature has no geometry, or one that cannot be converted.
    #[error("Feature '{name}' has an unusable geometry: {message}")]
    InvalidGeometry { name: String, message: String },
}

// =============================================================================
// Join Errors
// =============================================================================

/// Errors while joining boundaries to index records.
#[derive(Debug, Error)]
pub enum JoinError {
    /// Index countries with no boundary after alias mapping.
    #[error("{} countries have no boundary: {}", .0.len(), .0.join(", "))]
    UnmatchedCountries(Vec<String>),
}

// =============================================================================
// Matrix Errors
// =============================================================================

/// Errors while comparing two years of the dataset.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// The requested year has no column in the dataset.
    #[error("Year {year} is not in the dataset (available: {available})")]
    YearNotFound { year: i32, available: String },
}

// =============================================================================
// Scrape Errors
// =============================================================================

/// Errors while fetching the source table.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The page does not hold a table at the expected position.
    #[error("The expected table was not found on the page (wanted table {index}, page has {found})")]
    TableNotFound { index: usize, found: usize },

    /// The table was found but has no header row.
    #[error("Table {0} has no header row")]
    EmptyTable(usize),

    /// Writing the CSV failed.
    #[error("Failed to write CSV: {0}")]
    Write(String),

    /// IO error.
    #[error("Scrape IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Colour Errors
// =============================================================================

/// Errors from the colour helpers.
#[derive(Debug, Error)]
pub enum ColorError {
    /// Not a `#rrggbb` string.
    #[error("Invalid hex colour: {0}")]
    InvalidHex(String),

    /// Transparency outside [0, 1].
    #[error("Transparency must be between 0 and 1, got {0}")]
    InvalidTransparency(f64),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// Wraps every stage error so callers can use a single `?` chain.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading error.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Boundary error.
    #[error("Geometry error: {0}")]
    Geo(#[from] GeoError),

    /// Join error.
    #[error("Join error: {0}")]
    Join(#[from] JoinError),

    /// Year validation error.
    #[error("Matrix error: {0}")]
    Matrix(#[from] MatrixError),

    /// Scrape error.
    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    /// Colour error.
    #[error("Colour error: {0}")]
    Color(#[from] ColorError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for boundary operations.
pub type GeoResult<T> = Result<T, GeoError>;

/// Result type for year comparisons.
pub type MatrixResult<T> = Result<T, MatrixError>;

/// Result type for scraping.
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
