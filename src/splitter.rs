//! End-to-end split of an in-memory dataset.
//!
//! Each bucket gets its own generator derived from the master seed and a
//! component tag, so the three splitters are independent of one another and
//! of execution order. Partial splits are merged multi → singleton →
//! group-less.

use tracing::info;

use crate::config::SplitConfig;
use crate::constants::seeds::{
    GROUPLESS_TAG, MULTI_TAG, SINGLETON_TAG, SUBSAMPLE_TAG, UNSTRATIFIED_TAG,
};
use crate::data::Dataset;
use crate::errors::SplitError;
use crate::grouping::aggregate_groups;
use crate::partition::{IndexSplit, SplitResult, merge_partitions};
use crate::rng::DeterministicRng;
use crate::sampling::{bernoulli_assign, subsample_positions, uniform_split};
use crate::stratified::{Infeasible, split_multi_groups};

/// How the split was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SplitMode {
    /// Records were grouped by source before splitting.
    Stratified,
    /// Stratification disabled; one uniform split of the whole dataset.
    Unstratified,
    /// Stratification requested but no record carries the source field.
    MissingSourceField,
}

/// Bucket sizes and train/test counts for one split run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitReport {
    /// How the split was produced.
    pub mode: SplitMode,
    /// Records across multi-member groups.
    pub multi_records: usize,
    /// Number of multi-member groups.
    pub multi_groups: usize,
    /// Records whose source appears exactly once.
    pub singleton_records: usize,
    /// Records with no usable source value.
    pub groupless_records: usize,
    /// Records on the train side.
    pub train_records: usize,
    /// Records on the test side.
    pub test_records: usize,
    /// Set when the multi-member pool fell back to a uniform split.
    pub fallback: Option<Infeasible>,
}

impl SplitReport {
    fn new(mode: SplitMode) -> Self {
        Self {
            mode,
            multi_records: 0,
            multi_groups: 0,
            singleton_records: 0,
            groupless_records: 0,
            train_records: 0,
            test_records: 0,
            fallback: None,
        }
    }
}

/// Index split plus its report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitOutcome {
    /// Verified train/test indices.
    pub indices: IndexSplit,
    /// Counts and mode for the run.
    pub report: SplitReport,
}

/// Split `dataset` into verified train/test index sets.
pub fn split_indices(
    dataset: &Dataset,
    config: &SplitConfig,
) -> Result<SplitOutcome, SplitError> {
    let config = config.clone().validated()?;
    let total = dataset.len();

    if !config.stratify {
        return unstratified(total, &config, SplitMode::Unstratified);
    }
    if total > 0 && !dataset.has_field(&config.source_field) {
        info!(
            "[source_split:split] no record has field '{}'; performing a random split",
            config.source_field
        );
        return unstratified(total, &config, SplitMode::MissingSourceField);
    }

    info!(
        "[source_split:split] performing stratified split based on '{}'",
        config.source_field
    );
    let groups = aggregate_groups(dataset, &config.source_field);

    let mut report = SplitReport::new(SplitMode::Stratified);
    report.multi_records = groups.multi_len();
    report.multi_groups = groups.multi.len();
    report.singleton_records = groups.singletons.len();
    report.groupless_records = groups.groupless.len();

    let multi = split_multi_groups(
        &groups.multi,
        config.train_ratio,
        &mut DeterministicRng::for_component(config.seed, MULTI_TAG),
    );
    report.fallback = multi.fallback;

    let singletons = bernoulli_assign(
        groups.singletons,
        config.train_ratio,
        &mut DeterministicRng::for_component(config.seed, SINGLETON_TAG),
    );

    if !groups.groupless.is_empty() {
        info!(
            "[source_split:split] assigning {} records with missing '{}' randomly",
            groups.groupless.len(),
            config.source_field
        );
    }
    let groupless = uniform_split(
        groups.groupless,
        config.train_ratio,
        &mut DeterministicRng::for_component(config.seed, GROUPLESS_TAG),
    );

    let indices = merge_partitions(total, [multi.split, singletons, groupless])?;
    report.train_records = indices.train().len();
    report.test_records = indices.test().len();
    info!(
        "[source_split:split] multi={} ({} sources), singleton={}, groupless={} => train={}, test={}",
        report.multi_records,
        report.multi_groups,
        report.singleton_records,
        report.groupless_records,
        report.train_records,
        report.test_records
    );
    Ok(SplitOutcome { indices, report })
}

/// Split `dataset` and materialize the train/test datasets.
pub fn split_dataset(
    dataset: &Dataset,
    config: &SplitConfig,
) -> Result<(SplitResult, SplitReport), SplitError> {
    let outcome = split_indices(dataset, config)?;
    let result = outcome.indices.materialize(dataset)?;
    Ok((result, outcome.report))
}

/// Apply the configured subsample, if any.
///
/// Only `0 < n < dataset.len()` subsamples; anything else returns the dataset
/// unchanged.
pub fn subsample(dataset: Dataset, config: &SplitConfig) -> Dataset {
    let Some(amount) = config.subsample else {
        return dataset;
    };
    let mut rng = DeterministicRng::for_component(config.seed, SUBSAMPLE_TAG);
    match subsample_positions(dataset.len(), amount, &mut rng) {
        Some(positions) => {
            info!("[source_split:load] subsampling to {amount} records");
            dataset.select(&positions)
        }
        None => dataset,
    }
}

fn unstratified(
    total: usize,
    config: &SplitConfig,
    mode: SplitMode,
) -> Result<SplitOutcome, SplitError> {
    let split = uniform_split(
        (0..total).collect(),
        config.train_ratio,
        &mut DeterministicRng::for_component(config.seed, UNSTRATIFIED_TAG),
    );
    let indices = merge_partitions(total, [split])?;
    let mut report = SplitReport::new(mode);
    report.train_records = indices.train().len();
    report.test_records = indices.test().len();
    Ok(SplitOutcome { indices, report })
}
