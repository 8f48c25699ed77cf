//! Scraper for the source table.
//!
//! Fetches the article through the MediaWiki REST API, picks the table at
//! the configured position and writes it as the wide CSV every other command
//! reads.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use democracy::scrape::ScraperClient;
//!
//! let client = ScraperClient::from_config(&config)?;
//! let scraped = client.scrape(&config.source_title, config.table_index).await?;
//! save_csv(&scraped.table, &config.data_path)?;
//! ```

pub mod html;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::config::Config;
use crate::error::{ScrapeError, ScrapeResult};
use crate::logs::{log_info, log_success, log_warning};
use crate::transform::reshape::normalize_header;

pub use html::{cell_text, extract_tables, HtmlTable};

/// MediaWiki REST endpoint returning rendered article HTML.
pub const REST_ENDPOINT: &str = "https://en.wikipedia.org/api/rest_v1/page/html/";

const USER_AGENT: &str = concat!("democracy-index/", env!("CARGO_PKG_VERSION"));

/// A table pulled from a page.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedTable {
    pub table: HtmlTable,
    pub report: ScrapeReport,
}

/// Where and when a table was fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeReport {
    pub source: String,
    pub table_index: usize,
    pub tables_on_page: usize,
    pub columns: usize,
    pub rows: usize,
    pub fetched_at: DateTime<Utc>,
}

/// HTTP client for article pages.
#[derive(Clone)]
pub struct ScraperClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl ScraperClient {
    pub fn new() -> ScrapeResult<Self> {
        Self::from_config(&Config::default())
    }

    /// Client using the retry settings from `config`.
    pub fn from_config(config: &Config) -> ScrapeResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ScrapeError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: REST_ENDPOINT.to_string(),
            max_retries: config.max_retries.max(1),
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    /// Fetch pages from another host, e.g. a mirror.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn url_for(&self, title: &str) -> String {
        format!("{}{}", self.base_url, title.replace(' ', "_"))
    }

    /// Fetch page HTML, retrying failed attempts.
    pub async fn fetch_html(&self, title: &str) -> ScrapeResult<String> {
        let url = self.url_for(title);
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.try_fetch(&url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    log_warning(format!("Attempt {}/{} failed: {}", attempt, self.max_retries, e));
                    last_error = Some(e);

                    if attempt < self.max_retries {
                        log_info(format!("↻ Retrying in {}ms...", self.retry_delay_ms));
                        tokio::time::sleep(tokio::time::Duration::from_millis(self.retry_delay_ms)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ScrapeError::Request("no attempt made".to_string())))
    }

    async fn try_fetch(&self, url: &str) -> ScrapeResult<String> {
        log_info(format!("📡 Fetching {url}"));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| ScrapeError::Request(e.to_string()))
    }

    /// Fetch a page and select its table at `index`.
    pub async fn scrape(&self, title: &str, index: usize) -> ScrapeResult<ScrapedTable> {
        let html = self.fetch_html(title).await?;
        let scraped = table_from_html(&html, index, &self.url_for(title))?;
        log_success(format!(
            "Table {} of {}: {} rows × {} columns",
            index, scraped.report.tables_on_page, scraped.report.rows, scraped.report.columns
        ));
        Ok(scraped)
    }
}

/// Select the table at `index` from already fetched HTML.
pub fn table_from_html(html: &str, index: usize, source: &str) -> ScrapeResult<ScrapedTable> {
    let mut tables = extract_tables(html);
    let tables_on_page = tables.len();
    if index >= tables_on_page {
        return Err(ScrapeError::TableNotFound { index, found: tables_on_page });
    }
    let table = tables.swap_remove(index);
    if table.headers.is_empty() {
        return Err(ScrapeError::EmptyTable(index));
    }

    let report = ScrapeReport {
        source: source.to_string(),
        table_index: index,
        tables_on_page,
        columns: table.headers.len(),
        rows: table.rows.len(),
        fetched_at: Utc::now(),
    };
    Ok(ScrapedTable { table, report })
}

/// Write a table as CSV, normalising header names (`Regime type` becomes
/// `RegimeType`).
pub fn write_csv<W: Write>(table: &HtmlTable, writer: W) -> ScrapeResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    let write_err = |e: csv::Error| ScrapeError::Write(e.to_string());

    out.write_record(table.headers.iter().map(|h| normalize_header(h)))
        .map_err(write_err)?;
    for row in &table.rows {
        out.write_record(row).map_err(write_err)?;
    }
    out.flush()?;
    Ok(())
}

/// Write a table to `path`, creating parent directories.
pub fn save_csv(table: &HtmlTable, path: &Path) -> ScrapeResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_csv(table, File::create(path)?)?;
    log_success(format!("Saved {}", path.display()));
    Ok(())
}
