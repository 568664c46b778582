#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line runner shared by the binary and integration tests.
pub mod cli;
/// Split configuration types.
pub mod config;
/// Centralized constants used across splitting, loading, and export.
pub mod constants;
/// Record and dataset types.
pub mod data;
/// CSV output for finished splits.
pub mod export;
/// Source-based bucketing of a dataset.
pub mod grouping;
mod hash;
/// Directory-of-JSON dataset loading.
pub mod ingestion;
/// Per-source balance metrics for finished splits.
pub mod metrics;
/// Index splits, merge, and completeness checks.
pub mod partition;
/// Seeded per-component generators.
pub mod rng;
/// Uniform and Bernoulli splitters.
pub mod sampling;
/// End-to-end split orchestration.
pub mod splitter;
/// Stratified split of multi-member sources.
pub mod stratified;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::SplitConfig;
pub use data::{Dataset, Record, SourceKey};
pub use errors::SplitError;
pub use grouping::{SourceGroups, aggregate_groups};
pub use ingestion::{LoadedDataset, load_json_dir};
pub use partition::{IndexSplit, PartialSplit, SplitResult, merge_partitions};
pub use rng::DeterministicRng;
pub use splitter::{SplitMode, SplitOutcome, SplitReport, split_dataset, split_indices, subsample};
pub use stratified::{Infeasible, MultiSplit, StratifiedOutcome, split_multi_groups};
pub use types::{FieldName, RecordIndex};
