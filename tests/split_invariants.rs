use std::collections::{HashMap, HashSet};

use rand::Rng;
use serde_json::Value;

use source_split::grouping::aggregate_groups;
use source_split::metrics::group_balance;
use source_split::{
    Dataset, DeterministicRng, Infeasible, Record, SplitConfig, SplitMode, split_dataset,
    split_indices,
};

fn record(id: usize, source: Option<&str>) -> Record {
    let record = Record::default()
        .with("id", id as u64)
        .with("title", format!("article {id}"));
    match source {
        Some(source) => record.with("source", source),
        None => record,
    }
}

fn dataset_from(sources: &[Option<&str>]) -> Dataset {
    sources
        .iter()
        .enumerate()
        .map(|(id, source)| record(id, *source))
        .collect()
}

/// Random mix of multi-member, singleton and source-less records.
fn random_dataset(seed: u64, len: usize) -> Dataset {
    let mut rng = DeterministicRng::new(seed);
    let names: Vec<String> = (0..12).map(|idx| format!("outlet_{idx}")).collect();
    (0..len)
        .map(|id| {
            let roll: f64 = rng.random();
            if roll < 0.15 {
                record(id, None)
            } else if roll < 0.3 {
                let unique = format!("solo_{id}");
                record(id, Some(unique.as_str()))
            } else {
                let pick = rng.random_range(0..names.len());
                record(id, Some(names[pick].as_str()))
            }
        })
        .collect()
}

fn ids(dataset: &Dataset) -> Vec<u64> {
    dataset
        .records()
        .iter()
        .filter_map(|record| record.get("id").and_then(Value::as_u64))
        .collect()
}

#[test]
fn every_record_lands_on_exactly_one_side() {
    for seed in 0..25 {
        let dataset = random_dataset(seed, 40 + seed as usize * 7);
        let config = SplitConfig {
            seed,
            ..SplitConfig::default()
        };
        let (result, report) = split_dataset(&dataset, &config).unwrap();

        let train = ids(&result.train);
        let test = ids(&result.test);
        assert_eq!(train.len() + test.len(), dataset.len());
        assert_eq!(report.train_records, train.len());
        assert_eq!(report.test_records, test.len());

        let train_set: HashSet<u64> = train.iter().copied().collect();
        let test_set: HashSet<u64> = test.iter().copied().collect();
        assert!(train_set.is_disjoint(&test_set));
        let all: HashSet<u64> = train_set.union(&test_set).copied().collect();
        assert_eq!(all, (0..dataset.len() as u64).collect());
    }
}

#[test]
fn same_seed_reproduces_identical_membership() {
    let dataset = random_dataset(7, 120);
    let config = SplitConfig {
        seed: 31337,
        ..SplitConfig::default()
    };
    let first = split_indices(&dataset, &config).unwrap();
    let second = split_indices(&dataset, &config).unwrap();
    assert_eq!(first, second);

    let other = split_indices(
        &dataset,
        &SplitConfig {
            seed: 31338,
            ..config
        },
    )
    .unwrap();
    assert_ne!(first.indices, other.indices);
}

#[test]
fn multi_member_groups_track_the_target_ratio() {
    for seed in 0..20 {
        let dataset = random_dataset(100 + seed, 300);
        let config = SplitConfig {
            seed,
            train_ratio: 0.75,
            ..SplitConfig::default()
        };
        let outcome = split_indices(&dataset, &config).unwrap();
        assert!(outcome.report.fallback.is_none(), "seed {seed} fell back");

        let groups = aggregate_groups(&dataset, "source");
        let pool = groups.multi_len() as f64;
        let balance = group_balance(&groups, &outcome.indices, 0.75).expect("multi groups");
        for share in &balance.per_group {
            let size = share.size() as f64;
            assert!(
                share.deviation(0.75) <= 1.0 + size / pool,
                "source {} of {} got {} train records",
                share.source,
                share.size(),
                share.train
            );
        }
    }
}

#[test]
fn singleton_train_share_converges_to_ratio() {
    let sources: Vec<String> = (0..200).map(|idx| format!("unique_{idx}")).collect();
    let dataset: Dataset = sources
        .iter()
        .enumerate()
        .map(|(id, source)| record(id, Some(source.as_str())))
        .collect();

    let mut train = 0usize;
    let mut total = 0usize;
    for seed in 0..100 {
        let config = SplitConfig {
            seed,
            ..SplitConfig::default()
        };
        let outcome = split_indices(&dataset, &config).unwrap();
        assert_eq!(outcome.report.singleton_records, 200);
        train += outcome.report.train_records;
        total += dataset.len();
    }
    let share = train as f64 / total as f64;
    assert!((share - 0.8).abs() < 0.02, "singleton train share {share}");
}

#[test]
fn infeasible_stratification_falls_back_and_stays_complete() {
    let dataset = dataset_from(&[
        Some("a"),
        Some("a"),
        Some("b"),
        Some("b"),
        Some("c"),
        Some("c"),
        None,
        Some("solo"),
    ]);
    let config = SplitConfig::default();
    let first = split_indices(&dataset, &config).unwrap();
    assert_eq!(
        first.report.fallback,
        Some(Infeasible::TooFewForClasses {
            side: "test",
            requested: 2,
            classes: 3,
        })
    );
    assert_eq!(first.indices.len(), dataset.len());

    let second = split_indices(&dataset, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn ten_record_scenario_splits_four_group_three_to_one() {
    let dataset = dataset_from(&[
        Some("a"),
        Some("b"),
        Some("a"),
        Some("c"),
        Some("b"),
        Some("a"),
        Some("d"),
        Some("b"),
        Some("a"),
        Some("e"),
    ]);
    let config = SplitConfig::default();
    let (result, report) = split_dataset(&dataset, &config).unwrap();
    assert_eq!(report.mode, SplitMode::Stratified);
    assert_eq!(report.multi_groups, 2);
    assert_eq!(report.multi_records, 7);
    assert_eq!(report.singleton_records, 3);
    assert!(report.fallback.is_none());
    assert_eq!(result.train.len() + result.test.len(), 10);

    let mut per_source: HashMap<String, (usize, usize)> = HashMap::new();
    for (side, data) in [(0, &result.train), (1, &result.test)] {
        for record in data.records() {
            let source = record
                .get("source")
                .and_then(Value::as_str)
                .unwrap()
                .to_string();
            let entry = per_source.entry(source).or_default();
            if side == 0 {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
    }
    assert_eq!(per_source["a"], (3, 1));
    assert_eq!(per_source["b"], (2, 1));

    let (replay, _) = split_dataset(&dataset, &config).unwrap();
    assert_eq!(ids(&replay.train), ids(&result.train));
    assert_eq!(ids(&replay.test), ids(&result.test));
}

#[test]
fn unstratified_mode_splits_whole_dataset_by_ratio() {
    let dataset = random_dataset(3, 50);
    let config = SplitConfig {
        stratify: false,
        ..SplitConfig::default()
    };
    let (result, report) = split_dataset(&dataset, &config).unwrap();
    assert_eq!(report.mode, SplitMode::Unstratified);
    assert_eq!(result.train.len(), 40);
    assert_eq!(result.test.len(), 10);
}

#[test]
fn groupless_records_follow_rounded_ratio() {
    let dataset = dataset_from(&[None; 9]);
    let config = SplitConfig {
        train_ratio: 0.5,
        ..SplitConfig::default()
    };
    let outcome = split_indices(&dataset, &config).unwrap();
    // The field never appears, so this is the whole-dataset random split.
    assert_eq!(outcome.report.mode, SplitMode::MissingSourceField);
    assert_eq!(outcome.indices.train().len(), 4);

    let mut mixed = dataset_from(&[None; 9]).into_records();
    mixed.push(record(9, Some("only")));
    let outcome = split_indices(&Dataset::new(mixed), &config).unwrap();
    assert_eq!(outcome.report.mode, SplitMode::Stratified);
    assert_eq!(outcome.report.groupless_records, 9);
    assert_eq!(outcome.report.singleton_records, 1);
}
