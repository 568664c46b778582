use crate::types::SeedTag;

/// Constants used by split configuration defaults.
pub mod config {
    /// Default fraction of records routed to train.
    pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;
    /// Default master seed.
    pub const DEFAULT_SEED: u64 = 2025;
    /// Default grouping field.
    pub const DEFAULT_SOURCE_FIELD: &str = "source";
}

/// Constants used to derive per-component generators from the master seed.
pub mod seeds {
    use super::SeedTag;

    /// Generator tag for the multi-member stratified draw (and its fallback).
    pub const MULTI_TAG: SeedTag = "multi";
    /// Generator tag for singleton Bernoulli assignment.
    pub const SINGLETON_TAG: SeedTag = "singleton";
    /// Generator tag for the group-less uniform split.
    pub const GROUPLESS_TAG: SeedTag = "groupless";
    /// Generator tag for the whole-dataset split when stratification is off.
    pub const UNSTRATIFIED_TAG: SeedTag = "unstratified";
    /// Generator tag for optional pre-split subsampling.
    pub const SUBSAMPLE_TAG: SeedTag = "subsample";
}

/// Constants used by input discovery and output naming.
pub mod io {
    /// Default input directory of per-record JSON files.
    pub const DEFAULT_INPUT_DIR: &str = "jsons";
    /// Default prefix for the train/test CSV outputs.
    pub const DEFAULT_OUTPUT_PREFIX: &str = "article-bias-detection";
    /// Extension (case-insensitive) of files picked up as records.
    pub const RECORD_FILE_EXTENSION: &str = "json";
    /// Suffix appended to the output prefix for the train file.
    pub const TRAIN_FILE_SUFFIX: &str = "_train.csv";
    /// Suffix appended to the output prefix for the test file.
    pub const TEST_FILE_SUFFIX: &str = "_test.csv";
    /// Log message used when unreadable record files are skipped.
    pub const SKIP_UNREADABLE_MSG: &str = "skipping unreadable record file";
}
