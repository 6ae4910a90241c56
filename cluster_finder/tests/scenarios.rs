//! End-to-end scenarios straight out of the design spec's testable-properties
//! section: a predicate that records which row indices it was shown,
//! checked against the exact multiplicities the traversal state machine
//! promises.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cluster_finder::{FinderConfigBuilder, RandomSource, Verdict};
use ndarray::{Array2, ArrayView2};
use rstest::rstest;

const D: usize = 64;
const N: usize = 1000;

/// `DP` shaped (D, N), drawn uniformly in `[-1, 1]` from a seeded stream —
/// continuous enough that two active rows sharing a coordinate on every one
/// of 64 dimensions is not a case any of these seeds hit.
fn seeded_dp(seed: u64) -> Array2<f64> {
    let mut rng = RandomSource::from_seed(seed);
    Array2::from_shape_fn((D, N), |_| rng.uniform_real(-1.0, 1.0))
}

/// `NDP` shaped (N, 1): row `i`'s sole payload column is `i` itself, so a
/// predicate can recover which original rows it was shown straight out of
/// the subset it's handed.
fn row_index_ndp() -> Array2<f64> {
    Array2::from_shape_fn((N, 1), |(i, _)| i as f64)
}

fn record_indices(subset: ArrayView2<'_, f64>, seen: &RefCell<HashMap<usize, u32>>) {
    let mut seen = seen.borrow_mut();
    for row in subset.rows() {
        *seen.entry(row[0] as usize).or_insert(0) += 1;
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
fn exhaustive_enumeration_at_leaves_records_every_index_once(#[case] seed: u64) {
    let dp = seeded_dp(seed);
    let ndp = row_index_ndp();
    let seen = Rc::new(RefCell::new(HashMap::<usize, u32>::new()));
    let seen_inner = Rc::clone(&seen);

    let mut config = FinderConfigBuilder::new(move |subset: ArrayView2<'_, f64>| {
        record_indices(subset, &seen_inner);
        Verdict::Undecided
    })
    .min_count(1)
    .max_count(1)
    .max_depth(100)
    .build()
    .unwrap();

    let result = config.search(dp.view(), ndp.view(), Some(seed), Some(1)).unwrap();
    assert!(result.is_none(), "a predicate that never decides must exhaust the iteration cap");

    let seen = seen.borrow();
    assert_eq!(seen.len(), N, "every row index must have been recorded at least once");
    for i in 0..N {
        assert_eq!(seen.get(&i).copied(), Some(1), "index {i} recorded {:?} times, expected exactly 1", seen.get(&i));
    }
}

#[rstest]
#[case(1)]
#[case(2)]
fn double_pass_records_every_index_exactly_twice(#[case] seed: u64) {
    let dp = seeded_dp(seed);
    let ndp = row_index_ndp();
    let seen = Rc::new(RefCell::new(HashMap::<usize, u32>::new()));
    let seen_inner = Rc::clone(&seen);

    let mut config = FinderConfigBuilder::new(move |subset: ArrayView2<'_, f64>| {
        record_indices(subset, &seen_inner);
        Verdict::Undecided
    })
    .min_count(1)
    .max_count(1)
    .max_depth(100)
    .build()
    .unwrap();

    let result = config.search(dp.view(), ndp.view(), Some(seed), Some(2)).unwrap();
    assert!(result.is_none());

    let seen = seen.borrow();
    for i in 0..N {
        assert_eq!(seen.get(&i).copied(), Some(2), "index {i} recorded {:?} times, expected exactly 2", seen.get(&i));
    }
}

#[rstest]
#[case(1)]
#[case(2)]
fn small_clusters_are_counted_at_least_once(#[case] seed: u64) {
    let dp = seeded_dp(seed);
    let ndp = row_index_ndp();
    let seen = Rc::new(RefCell::new(HashMap::<usize, u32>::new()));
    let seen_inner = Rc::clone(&seen);

    let mut config = FinderConfigBuilder::new(move |subset: ArrayView2<'_, f64>| {
        record_indices(subset, &seen_inner);
        Verdict::Undecided
    })
    .max_count(2)
    .build()
    .unwrap();

    let result = config.search(dp.view(), ndp.view(), Some(seed), Some(1)).unwrap();
    assert!(result.is_none());

    let seen = seen.borrow();
    for i in 0..N {
        assert!(seen.get(&i).copied().unwrap_or(0) >= 1, "index {i} never recorded");
    }
}

#[rstest]
#[case(1)]
#[case(2)]
fn branch_aborts_on_odd_payload_exactly_once(#[case] seed: u64) {
    let dp = seeded_dp(seed);
    let ndp = row_index_ndp();
    let seen = Rc::new(RefCell::new(HashMap::<usize, u32>::new()));
    let seen_inner = Rc::clone(&seen);

    let mut config = FinderConfigBuilder::new(move |subset: ArrayView2<'_, f64>| {
        let has_odd = subset.rows().into_iter().any(|row| (row[0] as usize) % 2 == 1);
        record_indices(subset, &seen_inner);
        if has_odd {
            Verdict::Prune
        } else {
            Verdict::Undecided
        }
    })
    .max_count(8)
    .build()
    .unwrap();

    let result = config.search(dp.view(), ndp.view(), Some(seed), Some(1)).unwrap();
    assert!(result.is_none());

    let seen = seen.borrow();
    assert_eq!(seen.len(), N, "every row index must appear in the record set");
    for i in (1..N).step_by(2) {
        assert_eq!(
            seen.get(&i).copied(),
            Some(1),
            "odd index {i} recorded {:?} times, expected its branch pruned on first sight",
            seen.get(&i)
        );
    }
}
