//! Runtime configuration.
//!
//! Defaults point at the repository's data layout. Each value can be
//! overridden from the environment (a `.env` file is loaded first), and the
//! CLI overrides the environment.

use std::env;
use std::path::PathBuf;

/// Wide CSV written by the scraper and read by every other command.
pub const DEFAULT_DATA_PATH: &str = "data/raw/democracy_index.csv";

/// Natural Earth 1:110m admin-0 countries, as GeoJSON.
pub const DEFAULT_BOUNDARIES_PATH: &str = "data/external/ne_110m_admin_0_countries.geojson";

/// Wikipedia article holding the index table.
pub const DEFAULT_SOURCE_TITLE: &str = "The_Economist_Democracy_Index";

/// Position of the index table among the article's tables.
pub const DEFAULT_TABLE_INDEX: usize = 5;

/// Number of fetch attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Delay between fetch attempts in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_path: PathBuf,
    pub boundaries_path: PathBuf,
    pub source_title: String,
    pub table_index: usize,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            boundaries_path: PathBuf::from(DEFAULT_BOUNDARIES_PATH),
            source_title: DEFAULT_SOURCE_TITLE.to_string(),
            table_index: DEFAULT_TABLE_INDEX,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl Config {
    /// Defaults overridden by `DEMOCRACY_*` environment variables.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unparseable numbers keep
    /// their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("DEMOCRACY_DATA") {
            config.data_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("DEMOCRACY_BOUNDARIES") {
            config.boundaries_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("DEMOCRACY_SOURCE_TITLE") {
            config.source_title = v;
        }
        if let Some(v) = lookup("DEMOCRACY_TABLE_INDEX").and_then(|v| v.parse().ok()) {
            config.table_index = v;
        }
        if let Some(v) = lookup("DEMOCRACY_MAX_RETRIES").and_then(|v| v.parse().ok()) {
            config.max_retries = v;
        }
        if let Some(v) = lookup("DEMOCRACY_RETRY_DELAY_MS").and_then(|v| v.parse().ok()) {
            config.retry_delay_ms = v;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.table_index, 5);
        assert_eq!(config.source_title, "The_Economist_Democracy_Index");
        assert_eq!(config.data_path, PathBuf::from("data/raw/democracy_index.csv"));
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DEMOCRACY_DATA", "/tmp/index.csv"),
            ("DEMOCRACY_TABLE_INDEX", "4"),
            ("DEMOCRACY_MAX_RETRIES", "not a number"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.data_path, PathBuf::from("/tmp/index.csv"));
        assert_eq!(config.table_index, 4);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.boundaries_path, PathBuf::from(DEFAULT_BOUNDARIES_PATH));
    }
}
