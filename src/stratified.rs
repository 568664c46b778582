//! Stratified split of the multi-member source pool.
//!
//! All multi-member groups are split together in one draw stratified by
//! source label, rather than group by group. Train and test counts are fixed
//! for the pool first (`floor(ratio * n)` / remainder) and then apportioned
//! across sources by largest remainder, so each source's train share is as
//! close to `ratio` as whole records allow while the pool totals stay exact.
//!
//! When the pool cannot satisfy the per-source minimums the draw reports
//! [`Infeasible`] instead of failing, and [`split_multi_groups`] falls back to
//! one uniform split of the entire pool.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use rand::seq::{SliceRandom, index};
use tracing::{debug, warn};

use crate::data::SourceKey;
use crate::partition::PartialSplit;
use crate::sampling::uniform_split;
use crate::types::RecordIndex;

/// Why a stratified draw could not be made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Infeasible {
    /// The pool is too small for both sides to receive at least one record.
    EmptySide {
        /// Pool size.
        total: usize,
        /// Train count derived from the ratio.
        train: usize,
        /// Test count derived from the ratio.
        test: usize,
    },
    /// A source has fewer than two members and cannot appear on both sides.
    SparseClass {
        /// The undersized source.
        source: SourceKey,
        /// Its member count.
        members: usize,
    },
    /// One side has fewer slots than there are sources to place on it.
    TooFewForClasses {
        /// `"train"` or `"test"`.
        side: &'static str,
        /// Slots available on that side.
        requested: usize,
        /// Number of sources in the pool.
        classes: usize,
    },
}

impl fmt::Display for Infeasible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Infeasible::EmptySide { total, train, test } => write!(
                f,
                "pool of {total} records yields train={train}, test={test}; both sides need at least one record"
            ),
            Infeasible::SparseClass { source, members } => write!(
                f,
                "source '{source}' has only {members} member(s); at least 2 are required"
            ),
            Infeasible::TooFewForClasses {
                side,
                requested,
                classes,
            } => write!(
                f,
                "{side} size {requested} is smaller than the number of sources ({classes})"
            ),
        }
    }
}

/// Result of a single stratified draw attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StratifiedOutcome {
    /// Every source was split proportionally.
    Stratified(PartialSplit),
    /// No draw was made; the constraint that failed.
    Infeasible(Infeasible),
}

/// Multi-member split plus the fallback reason, if the fallback was taken.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultiSplit {
    /// Train/test indices for the whole multi-member pool.
    pub split: PartialSplit,
    /// Set when the pool was split uniformly instead.
    pub fallback: Option<Infeasible>,
}

/// Split every multi-member group, stratified by source.
///
/// On an infeasible draw the whole pool (in input order) is split with
/// [`uniform_split`] using the same generator. The infeasibility check runs
/// before any draw, so the fallback sees the generator exactly as seeded.
pub fn split_multi_groups<R: Rng + ?Sized>(
    groups: &BTreeMap<SourceKey, Vec<RecordIndex>>,
    ratio: f64,
    rng: &mut R,
) -> MultiSplit {
    if groups.is_empty() {
        return MultiSplit::default();
    }

    match stratified_draw(groups, ratio, rng) {
        StratifiedOutcome::Stratified(split) => {
            debug!(
                "[source_split:stratify] stratified {} sources: train={}, test={}",
                groups.len(),
                split.train.len(),
                split.test.len()
            );
            MultiSplit {
                split,
                fallback: None,
            }
        }
        StratifiedOutcome::Infeasible(reason) => {
            let mut pool: Vec<RecordIndex> = groups.values().flatten().copied().collect();
            pool.sort_unstable();
            warn!(
                "[source_split:stratify] stratified split of multi-member sources failed ({reason}); using random split for these {} records",
                pool.len()
            );
            MultiSplit {
                split: uniform_split(pool, ratio, rng),
                fallback: Some(reason),
            }
        }
    }
}

/// One stratified draw over the concatenation of `groups`.
///
/// Sources are visited in key order. Draw order: train allocation ties, test
/// allocation ties, then one shuffle per source, then a shuffle of each side.
pub fn stratified_draw<R: Rng + ?Sized>(
    groups: &BTreeMap<SourceKey, Vec<RecordIndex>>,
    ratio: f64,
    rng: &mut R,
) -> StratifiedOutcome {
    let counts: Vec<usize> = groups.values().map(Vec::len).collect();
    let total: usize = counts.iter().sum();
    let classes = counts.len();

    let n_train = ((ratio * total as f64).floor().max(0.0) as usize).min(total);
    let n_test = total - n_train;

    if n_train == 0 || n_test == 0 {
        return StratifiedOutcome::Infeasible(Infeasible::EmptySide {
            total,
            train: n_train,
            test: n_test,
        });
    }
    if let Some((source, members)) = groups.iter().find(|(_, members)| members.len() < 2) {
        return StratifiedOutcome::Infeasible(Infeasible::SparseClass {
            source: source.clone(),
            members: members.len(),
        });
    }
    if n_train < classes {
        return StratifiedOutcome::Infeasible(Infeasible::TooFewForClasses {
            side: "train",
            requested: n_train,
            classes,
        });
    }
    if n_test < classes {
        return StratifiedOutcome::Infeasible(Infeasible::TooFewForClasses {
            side: "test",
            requested: n_test,
            classes,
        });
    }

    let train_alloc = approximate_mode(&counts, n_train, rng);
    let remaining: Vec<usize> = counts
        .iter()
        .zip(&train_alloc)
        .map(|(count, taken)| count - taken)
        .collect();
    let test_alloc = approximate_mode(&remaining, n_test, rng);

    let mut split = PartialSplit::default();
    for ((members, take_train), take_test) in groups.values().zip(&train_alloc).zip(&test_alloc) {
        let mut shuffled = members.clone();
        shuffled.shuffle(rng);
        split.train.extend_from_slice(&shuffled[..*take_train]);
        split
            .test
            .extend_from_slice(&shuffled[*take_train..take_train + take_test]);
    }
    split.train.shuffle(rng);
    split.test.shuffle(rng);

    StratifiedOutcome::Stratified(split)
}

/// Apportion `draws` across classes proportionally to `counts`.
///
/// Each class first gets `floor(count * draws / total)`. Leftover draws go to
/// the classes with the largest remainders; ties on a remainder are broken
/// by sampling among the tied classes. Never exceeds a class's count.
fn approximate_mode<R: Rng + ?Sized>(counts: &[usize], draws: usize, rng: &mut R) -> Vec<usize> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0; counts.len()];
    }

    let mut allocated = Vec::with_capacity(counts.len());
    let mut remainders = Vec::with_capacity(counts.len());
    for count in counts {
        let scaled = count * draws;
        allocated.push(scaled / total);
        remainders.push(scaled % total);
    }

    let mut need = draws.saturating_sub(allocated.iter().sum());
    let mut levels = remainders.clone();
    levels.sort_unstable_by(|a, b| b.cmp(a));
    levels.dedup();

    for level in levels {
        if need == 0 {
            break;
        }
        let tied: Vec<usize> = remainders
            .iter()
            .enumerate()
            .filter_map(|(class, remainder)| (*remainder == level).then_some(class))
            .collect();
        let add_now = tied.len().min(need);
        for pick in index::sample(rng, tied.len(), add_now).iter() {
            allocated[tied[pick]] += 1;
        }
        need -= add_now;
    }

    allocated
}
