//! Source-based classification of a dataset into split buckets.
//!
//! Every record lands in exactly one bucket:
//! - multi-member groups (source seen more than once),
//! - singleton groups (source seen exactly once),
//! - group-less records (source absent or null).
//!
//! Buckets hold record indices only; the dataset itself is never copied or
//! mutated here.

use std::collections::BTreeMap;

use crate::data::{Dataset, SourceKey};
use crate::types::RecordIndex;

/// Index buckets produced by [`aggregate_groups`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceGroups {
    /// Groups with more than one member, keyed by source. Members keep input order.
    pub multi: BTreeMap<SourceKey, Vec<RecordIndex>>,
    /// Records whose source occurs exactly once, in input order.
    pub singletons: Vec<RecordIndex>,
    /// Records with no usable source value, in input order.
    pub groupless: Vec<RecordIndex>,
}

impl SourceGroups {
    /// Total number of records across all three buckets.
    pub fn total(&self) -> usize {
        self.multi_len() + self.singletons.len() + self.groupless.len()
    }

    /// Number of records across all multi-member groups.
    pub fn multi_len(&self) -> usize {
        self.multi.values().map(Vec::len).sum()
    }
}

/// Classify `dataset` by the value of `field`.
///
/// Grouping is plain equality on the value; callers must normalize case or
/// whitespace beforehand if they want those folded.
pub fn aggregate_groups(dataset: &Dataset, field: &str) -> SourceGroups {
    let mut by_source: BTreeMap<SourceKey, Vec<RecordIndex>> = BTreeMap::new();
    let mut groupless = Vec::new();

    for (index, record) in dataset.records().iter().enumerate() {
        match record.source_key(field) {
            Some(key) => by_source.entry(key).or_default().push(index),
            None => groupless.push(index),
        }
    }

    let mut multi = BTreeMap::new();
    let mut singletons = Vec::new();
    for (key, members) in by_source {
        if members.len() > 1 {
            multi.insert(key, members);
        } else {
            singletons.extend(members);
        }
    }
    // Bernoulli draws are consumed in input order, not key order.
    singletons.sort_unstable();

    SourceGroups {
        multi,
        singletons,
        groupless,
    }
}
