use ndarray::{Array1, ArrayView2};

use crate::bitmap::{produce_left_child, BitmapStack, BranchStack, BranchState};
use crate::dimension::DimensionSelector;
use crate::predicate::{Predicate, Verdict};
use crate::rng::RandomSource;

/// Runs the depth-first, iterative partitioning search over bitmap levels.
///
/// A preallocated stack plus a `while` loop driven by a level/head pointer,
/// rather than recursion, so the working set stays compact for large row
/// counts.
#[allow(clippy::too_many_arguments)]
pub(crate) fn traverse<T: Clone>(
    dp: ArrayView2<'_, f64>,
    ndp: ArrayView2<'_, T>,
    check: &mut dyn Predicate<T>,
    dimension_selector: &dyn DimensionSelector,
    min_count: usize,
    max_count: Option<usize>,
    height: usize,
    rng: &mut RandomSource,
    iterations: Option<u64>,
    verbose: bool,
) -> Option<Array1<bool>> {
    let n = dp.ncols();

    // A height of 0 or 1 leaves no level to split into (root occupies row 0
    // alone); no predicate call is possible. See DESIGN.md's Open Question
    // decision on `max_depth` computed from a tiny `N`.
    if height < 2 {
        return None;
    }

    let mut stack = BitmapStack::new(height, n);
    debug_assert_eq!(stack.height(), height, "bitmap stack allocated with the wrong height");
    let mut branches = BranchStack::new(height);
    let mut current_level = 1usize;
    let mut iteration_counter: u64 = 0;

    loop {
        match branches.get(current_level) {
            BranchState::Produce => {
                let (dim, split_point) =
                    produce_left_child(&mut stack, current_level, dp, dimension_selector, rng);
                if verbose {
                    eprintln!(
                        "level={current_level} produce dim={dim} split={split_point:.6} \
                         remaining={}",
                        stack.popcount(current_level)
                    );
                }
            }
            BranchState::Flip => {
                stack.flip_into_sibling(current_level, current_level - 1);
                if verbose {
                    eprintln!(
                        "level={current_level} flip remaining={}",
                        stack.popcount(current_level)
                    );
                }
            }
            BranchState::Exhausted => {
                branches.reset(current_level);
                stack.clear(current_level);
                if current_level > 1 {
                    current_level -= 1;
                    branches.advance(current_level);
                } else {
                    iteration_counter += 1;
                    if verbose {
                        eprintln!("iteration {iteration_counter} complete, restarting from root");
                    }
                    if let Some(cap) = iterations {
                        if iteration_counter >= cap {
                            return None;
                        }
                    }
                    // current_level stays 1; R[1] was just reset to Produce above.
                }
                continue;
            }
        }

        debug_assert!(
            stack
                .row(current_level)
                .iter()
                .zip(stack.row(current_level - 1).iter())
                .all(|(child, parent)| !*child || *parent),
            "parent-mask invariant violated at level {current_level}"
        );

        let remaining = stack.popcount(current_level);

        if remaining < min_count {
            branches.advance(current_level);
            continue;
        }

        if max_count.map_or(true, |m| remaining <= m) {
            let subset = stack.materialize_subset(current_level, ndp);
            match check.check(subset.view()) {
                Verdict::Accept => return Some(stack.to_owned_row(current_level)),
                Verdict::Prune => {
                    branches.advance(current_level);
                    continue;
                }
                Verdict::Undecided => {}
            }
        }

        if remaining <= 1 {
            branches.advance(current_level);
            continue;
        }

        if current_level + 1 >= height {
            branches.advance(current_level);
            continue;
        }

        current_level += 1;
    }
}
