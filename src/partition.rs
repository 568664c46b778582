//! Train/test index splits and the final merge with its completeness check.

use crate::data::Dataset;
use crate::errors::SplitError;
use crate::types::RecordIndex;

/// Train/test indices for one bucket of the dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartialSplit {
    /// Indices routed to train.
    pub train: Vec<RecordIndex>,
    /// Indices routed to test.
    pub test: Vec<RecordIndex>,
}

impl PartialSplit {
    /// Pair up train and test indices.
    pub fn new(train: Vec<RecordIndex>, test: Vec<RecordIndex>) -> Self {
        Self { train, test }
    }

    /// Indices on both sides.
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    /// True when neither side holds an index.
    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.test.is_empty()
    }
}

/// Verified index split covering every record of a dataset exactly once.
///
/// Only [`merge_partitions`] constructs this type, so holding one means the
/// completeness check has passed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexSplit {
    train: Vec<RecordIndex>,
    test: Vec<RecordIndex>,
}

impl IndexSplit {
    /// Train indices in merge order.
    pub fn train(&self) -> &[RecordIndex] {
        &self.train
    }

    /// Test indices in merge order.
    pub fn test(&self) -> &[RecordIndex] {
        &self.test
    }

    /// Number of records covered (train + test).
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    /// True for the split of an empty dataset.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve indices against the dataset they were computed from.
    pub fn materialize(&self, dataset: &Dataset) -> Result<SplitResult, SplitError> {
        if dataset.len() != self.len() {
            return Err(SplitError::PartitionInvariant(format!(
                "split covers {} records but dataset holds {}",
                self.len(),
                dataset.len()
            )));
        }
        Ok(SplitResult {
            train: dataset.select(&self.train),
            test: dataset.select(&self.test),
        })
    }
}

/// Final train/test datasets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SplitResult {
    /// Training records.
    pub train: Dataset,
    /// Evaluation records.
    pub test: Dataset,
}

/// Concatenate bucket splits (in the given order) and verify the result.
///
/// Every index in `0..total` must appear exactly once across train and test.
/// A missing, repeated or out-of-range index is a bug in the caller and is
/// reported as [`SplitError::PartitionInvariant`]; nothing is dropped or
/// patched up here.
pub fn merge_partitions<I>(total: usize, parts: I) -> Result<IndexSplit, SplitError>
where
    I: IntoIterator<Item = PartialSplit>,
{
    let mut train = Vec::with_capacity(total);
    let mut test = Vec::new();
    for part in parts {
        train.extend(part.train);
        test.extend(part.test);
    }

    let mut seen = vec![false; total];
    for (side, indices) in [("train", &train), ("test", &test)] {
        for &index in indices {
            let Some(slot) = seen.get_mut(index) else {
                return Err(SplitError::PartitionInvariant(format!(
                    "{side} holds index {index} outside a dataset of {total} records"
                )));
            };
            if *slot {
                return Err(SplitError::PartitionInvariant(format!(
                    "index {index} assigned more than once (last seen in {side})"
                )));
            }
            *slot = true;
        }
    }
    if let Some(missing) = seen.iter().position(|assigned| !assigned) {
        let missing_count = seen.iter().filter(|assigned| !**assigned).count();
        return Err(SplitError::PartitionInvariant(format!(
            "{missing_count} record(s) never assigned, first missing index {missing}"
        )));
    }

    Ok(IndexSplit { train, test })
}
