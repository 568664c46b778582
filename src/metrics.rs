use std::collections::HashSet;

use crate::data::SourceKey;
use crate::grouping::SourceGroups;
use crate::partition::IndexSplit;
use crate::types::RecordIndex;

/// Train/test counts for one source group after a split.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupShare {
    /// Group key.
    pub source: SourceKey,
    /// Members on the train side.
    pub train: usize,
    /// Members on the test side.
    pub test: usize,
    /// `train / (train + test)`.
    pub train_share: f64,
}

impl GroupShare {
    /// Group size.
    pub fn size(&self) -> usize {
        self.train + self.test
    }

    /// Distance between achieved and target train counts, in records.
    pub fn deviation(&self, ratio: f64) -> f64 {
        (self.train as f64 - ratio * self.size() as f64).abs()
    }
}

/// Aggregate balance of multi-member groups across a split.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupBalance {
    /// Number of multi-member groups.
    pub groups: usize,
    /// Groups with no member on the train side.
    pub train_absent: usize,
    /// Groups with no member on the test side.
    pub test_absent: usize,
    /// Largest per-group deviation from the target, in records.
    pub max_deviation: f64,
    /// Per-group shares sorted by size descending, then source.
    pub per_group: Vec<GroupShare>,
}

/// Per-source train/test counts for every multi-member group in `groups`.
///
/// Returns `None` when there are no multi-member groups.
pub fn group_balance(
    groups: &SourceGroups,
    split: &IndexSplit,
    ratio: f64,
) -> Option<GroupBalance> {
    if groups.multi.is_empty() {
        return None;
    }
    let train: HashSet<RecordIndex> = split.train().iter().copied().collect();

    let mut per_group: Vec<GroupShare> = groups
        .multi
        .iter()
        .map(|(source, members)| {
            let in_train = members.iter().filter(|index| train.contains(*index)).count();
            let in_test = members.len() - in_train;
            GroupShare {
                source: source.clone(),
                train: in_train,
                test: in_test,
                train_share: in_train as f64 / members.len() as f64,
            }
        })
        .collect();
    per_group.sort_by(|a, b| b.size().cmp(&a.size()).then_with(|| a.source.cmp(&b.source)));

    let max_deviation = per_group
        .iter()
        .map(|share| share.deviation(ratio))
        .fold(0.0, f64::max);
    Some(GroupBalance {
        groups: per_group.len(),
        train_absent: per_group.iter().filter(|share| share.train == 0).count(),
        test_absent: per_group.iter().filter(|share| share.test == 0).count(),
        max_deviation,
        per_group,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{PartialSplit, merge_partitions};

    fn groups_of(sizes: &[(&str, usize)]) -> SourceGroups {
        let mut next = 0;
        let mut groups = SourceGroups::default();
        for (name, size) in sizes {
            groups
                .multi
                .insert(SourceKey::from(*name), (next..next + size).collect());
            next += size;
        }
        groups
    }

    #[test]
    fn group_balance_reports_shares_and_deviation() {
        let groups = groups_of(&[("a", 4), ("b", 2)]);
        let split = merge_partitions(6, [PartialSplit::new(vec![0, 1, 2, 4], vec![3, 5])]).unwrap();
        let balance = group_balance(&groups, &split, 0.75).expect("balance");
        assert_eq!(balance.groups, 2);
        assert_eq!(balance.train_absent, 0);
        assert_eq!(balance.test_absent, 0);
        assert_eq!(balance.per_group[0].source, SourceKey::from("a"));
        assert_eq!(balance.per_group[0].train, 3);
        assert!((balance.per_group[0].train_share - 0.75).abs() < 1e-9);
        assert!((balance.max_deviation - 0.5).abs() < 1e-9);
    }

    #[test]
    fn group_balance_flags_groups_missing_from_a_side() {
        let groups = groups_of(&[("a", 2)]);
        let split = merge_partitions(2, [PartialSplit::new(vec![0, 1], vec![])]).unwrap();
        let balance = group_balance(&groups, &split, 0.5).expect("balance");
        assert_eq!(balance.test_absent, 1);
        assert_eq!(balance.train_absent, 0);
    }

    #[test]
    fn group_balance_is_none_without_multi_groups() {
        let split = merge_partitions(0, Vec::<PartialSplit>::new()).unwrap();
        assert!(group_balance(&SourceGroups::default(), &split, 0.8).is_none());
    }
}
