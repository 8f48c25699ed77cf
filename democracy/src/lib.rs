//! # Democracy Index - reshaping, aggregation and maps
//!
//! Turns the Economist Democracy Index table (one column per year) into
//! long records, then derives averages, regime categories, transition
//! matrices and GeoJSON maps from a single in-memory dataset.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Wikipedia  │────▶│   Scrape    │────▶│  Wide CSV   │────▶│   Reshape   │
//! │  (REST API) │     │ (table #5)  │     │  (data/raw) │     │  (Dataset)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                                    │
//!                  ┌──────────────────────┬──────────────────────────┤
//!                  ▼                      ▼                          ▼
//!           ┌─────────────┐        ┌─────────────┐           ┌─────────────┐
//!           │  Averages   │        │ Transitions │           │  Geo join   │
//!           │  (filters)  │        │ (classify)  │           │  (GeoJSON)  │
//!           └─────────────┘        └─────────────┘           └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use democracy::{load_dataset, TransitionMatrix};
//! use std::path::Path;
//!
//! let loaded = load_dataset(Path::new("data/raw/democracy_index.csv"))?;
//! let matrix = TransitionMatrix::build(&loaded.dataset, 2006, 2023)?;
//! println!("{}", matrix.to_table());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Records, averages, regime categories
//! - [`parser`] - CSV parsing with auto-detection
//! - [`transform`] - Reshaping, dataset views, transitions, index changes
//! - [`geo`] - Boundary loading, joins and GeoJSON export
//! - [`scrape`] - Source table download
//! - [`colors`] - Palette and region colours
//! - [`config`] - Paths and fetch settings
//! - [`logs`] - Progress logging

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Geography
pub mod geo;

// Source
pub mod scrape;

// Presentation
pub mod colors;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    ColorError,
    GeoError,
    JoinError,
    LoadError,
    MatrixError,
    PipelineError,
    PipelineResult,
    ScrapeError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    ClassifiedRecord,
    IndexChange,
    IndexRecord,
    RegimeCategory,
    RegionAverage,
    YearAverage,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    parse_str,
    parse_file_auto,
    parse_bytes_auto,
    detect_encoding,
    detect_delimiter,
    decode_content,
    CsvError,
    ParseResult,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    index_changes,
    region_averages_of,
    world_average_of,
    wide_to_long,
    Dataset,
    TransitionMatrix,
    WideLayout,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    load_bytes,
    load_dataset,
    load_parsed,
    write_long_csv,
    CsvInfo,
    LoadedDataset,
};

// =============================================================================
// Re-exports - Geo
// =============================================================================

pub use geo::{
    changes_to_geojson,
    load_boundaries,
    parse_boundaries,
    records_to_geojson,
    CountryBoundary,
    GeoJoin,
    GeoJoiner,
    JoinReport,
};

// =============================================================================
// Re-exports - Scrape, Config
// =============================================================================

pub use scrape::{save_csv, table_from_html, write_csv, ScrapeReport, ScrapedTable, ScraperClient};

pub use config::Config;
