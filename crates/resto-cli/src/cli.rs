//! CLI argument definitions for the strategy recommender.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "resto-advisor",
    version,
    about = "Restaurant strategy recommender - rank business strategies for a customer dataset",
    long_about = "Map a customer dataset onto the features of a trained classifier and rank\n\
                  predefined business strategies with TOPSIS.\n\n\
                  The catalog directory holds features.csv, synonyms.toml, strategies.json\n\
                  and classifier.json. It defaults to $RESTO_CATALOG_DIR, then to the\n\
                  catalog/ directory of the workspace."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Map a dataset and rank strategies for it.
    Analyze(AnalyzeArgs),

    /// Map a dataset onto the classifier features without ranking.
    Map(MapArgs),

    /// List feature metadata grouped by category.
    Features(CatalogArgs),

    /// List the strategy catalog.
    Strategies(StrategiesArgs),
}

#[derive(Args)]
pub struct CatalogArgs {
    /// Catalog directory (default: $RESTO_CATALOG_DIR or the bundled catalog/).
    #[arg(long = "catalog-dir", value_name = "DIR")]
    pub catalog_dir: Option<PathBuf>,

    /// Classifier artifact JSON (default: <CATALOG_DIR>/classifier.json).
    #[arg(long = "classifier", value_name = "PATH")]
    pub classifier: Option<PathBuf>,
}

#[derive(Args)]
pub struct MappingArgs {
    /// Minimum number of mapped features for the dataset to be usable.
    #[arg(long = "min-matches", default_value_t = 5)]
    pub min_matches: usize,

    /// Minimum token-sort similarity (0-100) for a fuzzy column match.
    #[arg(long = "fuzzy-threshold", default_value_t = 75.0, value_parser = parse_threshold)]
    pub fuzzy_threshold: f64,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Customer dataset CSV with a header row.
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Number of top strategies shown with a feature breakdown.
    #[arg(long = "top", default_value_t = 3)]
    pub top: usize,

    /// Directory for CSV and JSON exports.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Console output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct MapArgs {
    /// Customer dataset CSV with a header row.
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Directory for the mapping table and mapped feature columns.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Console output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct StrategiesArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Only list strategies of this group (case-insensitive).
    #[arg(long = "group", value_name = "GROUP")]
    pub group: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("threshold must be between 0 and 100, got {value}"))
    }
}
