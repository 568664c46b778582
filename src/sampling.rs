//! Unstratified splitters: the uniform sample-without-replacement split and
//! the per-record Bernoulli assignment.

use rand::Rng;
use rand::seq::index;

use crate::partition::PartialSplit;
use crate::types::RecordIndex;

/// Train count for `total` records at `ratio`, rounding half to even.
pub fn train_count(total: usize, ratio: f64) -> usize {
    let count = (ratio * total as f64).round_ties_even();
    (count.max(0.0) as usize).min(total)
}

/// Pick `round(ratio * n)` records uniformly without replacement for train.
///
/// Train keeps the sampled order; test keeps input order.
pub fn uniform_split<R: Rng + ?Sized>(
    indices: Vec<RecordIndex>,
    ratio: f64,
    rng: &mut R,
) -> PartialSplit {
    let total = indices.len();
    let amount = train_count(total, ratio);
    let picked = index::sample(rng, total, amount);

    let mut chosen = vec![false; total];
    let mut train = Vec::with_capacity(amount);
    for position in picked.iter() {
        chosen[position] = true;
        train.push(indices[position]);
    }
    let test = indices
        .into_iter()
        .zip(chosen)
        .filter_map(|(record, is_train)| (!is_train).then_some(record))
        .collect();

    PartialSplit::new(train, test)
}

/// Independent Bernoulli(`ratio`) trial per record.
///
/// One uniform draw in `[0, 1)` is consumed per record, in input order; the
/// record goes to train when the draw is below `ratio`. Only the expected
/// train share equals `ratio`.
pub fn bernoulli_assign<R: Rng + ?Sized>(
    indices: Vec<RecordIndex>,
    ratio: f64,
    rng: &mut R,
) -> PartialSplit {
    let mut split = PartialSplit::default();
    for record in indices {
        let draw: f64 = rng.random();
        if draw < ratio {
            split.train.push(record);
        } else {
            split.test.push(record);
        }
    }
    split
}

/// Choose `amount` of `total` positions uniformly, in sampled order.
///
/// Returns `None` when `amount` is zero or not smaller than `total`, meaning
/// no subsampling applies.
pub fn subsample_positions<R: Rng + ?Sized>(
    total: usize,
    amount: usize,
    rng: &mut R,
) -> Option<Vec<RecordIndex>> {
    if amount == 0 || amount >= total {
        return None;
    }
    Some(index::sample(rng, total, amount).into_vec())
}
