use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, error::ErrorKind};
use tracing::{error, info, warn};

use crate::config::{SplitConfig, validate_train_ratio};
use crate::constants::config::{DEFAULT_SEED, DEFAULT_SOURCE_FIELD, DEFAULT_TRAIN_RATIO};
use crate::constants::io::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_PREFIX};
use crate::errors::SplitError;
use crate::export::{OutputPaths, write_split};
use crate::grouping::aggregate_groups;
use crate::ingestion::load_json_dir;
use crate::metrics::group_balance;
use crate::splitter::{SplitMode, SplitReport, split_indices, subsample};

#[derive(Debug, Parser)]
#[command(
    name = "source_split",
    disable_help_subcommand = true,
    about = "Merge JSON record files into train/test CSV splits",
    long_about = "Load one JSON object per file from a folder, optionally subsample, split into train/test stratified by a source field, and write two CSV files.",
    after_help = "Sources seen more than once are split in one stratified draw, single-occurrence sources are assigned to train with probability --train-ratio, and records without a source are split at random."
)]
/// CLI for `source_split`.
///
/// Common usage:
/// - Default run: `source_split --folder jsons`
/// - Custom outputs: `--output-prefix out/bias` writes `out/bias_train.csv` and `out/bias_test.csv`
/// - Plain random split: `--no-stratify`
struct SplitCli {
    #[arg(
        long,
        value_name = "DIR",
        default_value = DEFAULT_INPUT_DIR,
        help = "Path to folder containing JSON files"
    )]
    folder: PathBuf,
    #[arg(
        long = "output-prefix",
        visible_alias = "output_prefix",
        value_name = "PREFIX",
        default_value = DEFAULT_OUTPUT_PREFIX,
        help = "Prefix for output CSV files"
    )]
    output_prefix: String,
    #[arg(long, value_name = "N", help = "Number of records to subsample")]
    subsample: Option<usize>,
    #[arg(
        long = "train-ratio",
        visible_alias = "train_ratio",
        default_value_t = DEFAULT_TRAIN_RATIO,
        value_parser = parse_train_ratio,
        help = "Fraction of data to use for training"
    )]
    train_ratio: f64,
    #[arg(long, default_value_t = DEFAULT_SEED, help = "Random seed for reproducibility")]
    seed: u64,
    #[arg(
        long = "no-stratify",
        help = "Disable stratified split based on the source field"
    )]
    no_stratify: bool,
    #[arg(
        long = "source-field",
        default_value = DEFAULT_SOURCE_FIELD,
        help = "Field used to group records by origin"
    )]
    source_field: String,
}

/// Inputs for one end-to-end run.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Folder scanned (non-recursively) for `*.json` files.
    pub folder: PathBuf,
    /// Outputs land at `{prefix}_train.csv` and `{prefix}_test.csv`.
    pub output_prefix: String,
    /// Split settings.
    pub config: SplitConfig,
}

/// What one run produced.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Records parsed before any subsampling.
    pub loaded: usize,
    /// Files skipped as unreadable.
    pub skipped: usize,
    /// Bucket counts and mode of the split.
    pub report: SplitReport,
    /// Files written.
    pub outputs: OutputPaths,
}

impl SplitCli {
    fn into_options(self) -> RunOptions {
        RunOptions {
            folder: self.folder,
            output_prefix: self.output_prefix,
            config: SplitConfig {
                train_ratio: self.train_ratio,
                seed: self.seed,
                stratify: !self.no_stratify,
                source_field: self.source_field,
                subsample: self.subsample,
            },
        }
    }
}

/// Load, split, and write both CSV files.
///
/// The CSV header is the field union of everything loaded, taken before any
/// subsampling. An empty input folder is fatal and nothing is written.
pub fn run(options: &RunOptions) -> Result<RunSummary, SplitError> {
    let config = options.config.clone().validated()?;
    let loaded = load_json_dir(&options.folder)?;
    if loaded.dataset.is_empty() {
        error!("[source_split:run] no data found; exiting");
        return Err(SplitError::EmptyInput {
            path: options.folder.clone(),
        });
    }
    let loaded_count = loaded.dataset.len();
    let skipped = loaded.skipped.len();

    let columns = loaded.dataset.columns();
    let dataset = subsample(loaded.dataset, &config);
    let outcome = split_indices(&dataset, &config)?;

    if outcome.report.mode == SplitMode::Stratified {
        let groups = aggregate_groups(&dataset, &config.source_field);
        if let Some(balance) = group_balance(&groups, &outcome.indices, config.train_ratio) {
            info!(
                "[source_split:run] {} multi-member sources, max deviation {:.2} records from target",
                balance.groups, balance.max_deviation
            );
            if balance.test_absent > 0 || balance.train_absent > 0 {
                warn!(
                    "[source_split:run] {} sources missing from test, {} missing from train",
                    balance.test_absent, balance.train_absent
                );
            }
        }
    }

    let result = outcome.indices.materialize(&dataset)?;
    let outputs = OutputPaths::from_prefix(&options.output_prefix);
    write_split(&result, &columns, &outputs)?;

    Ok(RunSummary {
        loaded: loaded_count,
        skipped,
        report: outcome.report,
        outputs,
    })
}

/// Parse `args_iter` (without the program name) and run.
pub fn run_split_cli<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let Some(cli) =
        parse_cli::<SplitCli, _>(std::iter::once("source_split".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let summary = run(&cli.into_options())?;
    println!("CSV files created successfully:");
    println!(
        "  - Training set: '{}' with {} records.",
        summary.outputs.train.display(),
        summary.report.train_records
    );
    println!(
        "  - Testing set: '{}' with {} records.",
        summary.outputs.test.display(),
        summary.report.test_records
    );
    if let Some(reason) = &summary.report.fallback {
        println!("  - Note: multi-member sources were split at random ({reason}).");
    }
    Ok(())
}

fn parse_train_ratio(raw: &str) -> Result<f64, String> {
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid train ratio '{}': must be a float", raw.trim()))?;
    validate_train_ratio(parsed).map_err(|err| err.to_string())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
