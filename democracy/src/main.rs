//! Democracy Index CLI
//!
//! # Commands
//!
//! ```bash
//! democracy scrape                          # Fetch the source table into data/raw
//! democracy reshape                         # Wide CSV to long CSV
//! democracy filter --region "North America" --year 2023
//! democracy world-average                   # Mean index per year
//! democracy region-averages                 # Mean index per (region, year)
//! democracy classify 2023                   # Records with their regime category
//! democracy map 2023 --strict               # GeoJSON for one year
//! democracy change 2006 2023                # GeoJSON of index changes
//! democracy transitions 2006 2023           # Regime transition matrix
//! ```
//!
//! Data goes to stdout (or `--output`); progress goes to stderr.

use clap::{Parser, Subcommand};
use democracy::logs::log_error;
use democracy::{
    changes_to_geojson, index_changes, load_boundaries, load_dataset, records_to_geojson, save_csv,
    write_long_csv, Config, Dataset, GeoJoiner, IndexRecord, ScraperClient, TransitionMatrix,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "democracy")]
#[command(about = "Reshape, aggregate and map the Democracy Index", long_about = None)]
struct Cli {
    /// Wide CSV to read (default: $DEMOCRACY_DATA or data/raw/democracy_index.csv)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the index table and save it as the wide CSV
    Scrape {
        /// Article title (default: $DEMOCRACY_SOURCE_TITLE)
        #[arg(long)]
        title: Option<String>,

        /// Position of the table on the page
        #[arg(long)]
        table_index: Option<usize>,
    },

    /// Convert the wide CSV to one row per (country, year)
    Reshape {
        /// Input CSV file (same as --data)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Select records; repeated flags of one kind are alternatives
    Filter {
        #[arg(long)]
        region: Vec<String>,

        #[arg(long)]
        country: Vec<String>,

        /// Source regime label, e.g. "Flawed democracy"
        #[arg(long)]
        regime: Vec<String>,

        #[arg(long)]
        year: Option<i32>,
    },

    /// Mean index per year over all countries
    WorldAverage,

    /// Mean index per region and year
    RegionAverages {
        /// Restrict to these regions
        #[arg(long)]
        region: Vec<String>,
    },

    /// Records of one year with their regime category
    Classify { year: i32 },

    /// GeoJSON map of one year
    Map {
        year: i32,

        /// GeoJSON country boundaries (default: $DEMOCRACY_BOUNDARIES)
        #[arg(long)]
        boundaries: Option<PathBuf>,

        /// Fail when an index country has no boundary
        #[arg(long)]
        strict: bool,

        /// Country allowed to lack a boundary in strict mode
        #[arg(long)]
        exempt: Vec<String>,
    },

    /// GeoJSON map of index changes between two years
    Change {
        start: i32,
        end: i32,

        #[arg(long)]
        boundaries: Option<PathBuf>,
    },

    /// Regime transition matrix between two years
    Transitions {
        start: i32,
        end: i32,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    let output = cli.output.as_deref();

    let result = match cli.command {
        Commands::Scrape { title, table_index } => cmd_scrape(&config, title, table_index, output).await,
        Commands::Reshape { input } => cmd_reshape(input.as_deref().unwrap_or(&config.data_path), output),
        Commands::Filter {
            region,
            country,
            regime,
            year,
        } => cmd_filter(&config, &region, &country, &regime, year, output),
        Commands::WorldAverage => cmd_world_average(&config, output),
        Commands::RegionAverages { region } => cmd_region_averages(&config, &region, output),
        Commands::Classify { year } => cmd_classify(&config, year, output),
        Commands::Map {
            year,
            boundaries,
            strict,
            exempt,
        } => {
            let boundaries = boundaries.unwrap_or_else(|| config.boundaries_path.clone());
            cmd_map(&config, year, &boundaries, strict, exempt, output)
        }
        Commands::Change { start, end, boundaries } => {
            let boundaries = boundaries.unwrap_or_else(|| config.boundaries_path.clone());
            cmd_change(&config, start, end, &boundaries, output)
        }
        Commands::Transitions { start, end, json } => cmd_transitions(&config, start, end, json, output),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

async fn cmd_scrape(config: &Config, title: Option<String>, table_index: Option<usize>, output: Option<&Path>) -> CliResult {
    let title = title.unwrap_or_else(|| config.source_title.clone());
    let index = table_index.unwrap_or(config.table_index);
    let path = output.unwrap_or(&config.data_path);

    let client = ScraperClient::from_config(config)?;
    let scraped = client.scrape(&title, index).await?;
    save_csv(&scraped.table, path)?;

    eprintln!("{}", serde_json::to_string_pretty(&scraped.report)?);
    Ok(())
}

fn cmd_reshape(input: &Path, output: Option<&Path>) -> CliResult {
    let dataset = load(input)?;

    let mut buf = Vec::new();
    write_long_csv(dataset.records(), &mut buf)?;
    write_output(&String::from_utf8(buf)?, output)
}

fn cmd_filter(
    config: &Config,
    regions: &[String],
    countries: &[String],
    regimes: &[String],
    year: Option<i32>,
    output: Option<&Path>,
) -> CliResult {
    let dataset = load(&config.data_path)?;
    if let Some(year) = year {
        dataset.require_year(year)?;
    }

    let mut records: Vec<&IndexRecord> = dataset.records().iter().collect();
    if !regions.is_empty() {
        records.retain(|r| regions.contains(&r.region));
    }
    if !countries.is_empty() {
        records.retain(|r| countries.contains(&r.country));
    }
    if !regimes.is_empty() {
        records.retain(|r| regimes.contains(&r.regime_type));
    }
    if let Some(year) = year {
        records.retain(|r| r.year == year);
    }

    eprintln!("🔎 {} records", records.len());
    write_json(&records, output)
}

fn cmd_world_average(config: &Config, output: Option<&Path>) -> CliResult {
    let dataset = load(&config.data_path)?;
    write_json(&dataset.world_average(), output)
}

fn cmd_region_averages(config: &Config, regions: &[String], output: Option<&Path>) -> CliResult {
    let dataset = load(&config.data_path)?;
    let averages = if regions.is_empty() {
        dataset.region_averages()
    } else {
        let regions: Vec<&str> = regions.iter().map(String::as_str).collect();
        democracy::region_averages_of(dataset.filter_by_region(&regions))
    };
    write_json(&averages, output)
}

fn cmd_classify(config: &Config, year: i32, output: Option<&Path>) -> CliResult {
    let dataset = load(&config.data_path)?;
    dataset.require_year(year)?;
    write_json(&dataset.classified_year(year), output)
}

fn cmd_map(
    config: &Config,
    year: i32,
    boundaries: &Path,
    strict: bool,
    exempt: Vec<String>,
    output: Option<&Path>,
) -> CliResult {
    let dataset = load(&config.data_path)?;
    let shapes = load_boundaries(boundaries)?;
    eprintln!("🗺️  {} boundaries", shapes.len());

    let joined = GeoJoiner::new().strict(strict).exempt(exempt).join_year(&shapes, &dataset, year)?;
    write_output(&records_to_geojson(&joined.rows).to_string(), output)
}

fn cmd_change(config: &Config, start: i32, end: i32, boundaries: &Path, output: Option<&Path>) -> CliResult {
    let dataset = load(&config.data_path)?;
    let changes = index_changes(&dataset, start, end)?;
    let shapes = load_boundaries(boundaries)?;

    let joined = GeoJoiner::new().join_changes(&shapes, &changes)?;
    write_output(&changes_to_geojson(&joined.rows).to_string(), output)
}

fn cmd_transitions(config: &Config, start: i32, end: i32, json: bool, output: Option<&Path>) -> CliResult {
    let dataset = load(&config.data_path)?;
    let matrix = TransitionMatrix::build(&dataset, start, end)?;

    eprintln!(
        "🔁 {} countries, {} unchanged",
        matrix.total(),
        matrix.unchanged()
    );
    if json {
        write_json(&matrix, output)
    } else {
        write_output(matrix.to_table().trim_end(), output)
    }
}

fn load(path: &Path) -> Result<Dataset, Box<dyn std::error::Error>> {
    Ok(load_dataset(path)?.dataset)
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: Option<&Path>) -> CliResult {
    let json = serde_json::to_string_pretty(value)?;
    write_output(&json, path)
}

fn write_output(content: &str, path: Option<&Path>) -> CliResult {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
