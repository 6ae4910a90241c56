use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// The ternary outcome of a predicate call.
///
/// `Accept` terminates the search with the current bitmap as the answer.
/// `Prune` rejects the current child without descending into it, but leaves
/// its sibling to be tried. `Undecided` falls through to the normal descent
/// decision (depth cap / size-1 checks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Accept,
    Undecided,
    Prune,
}

impl Verdict {
    /// Boundary conversion for predicates written against the integer-sign
    /// convention: `>0` accept, `0` undecided, `<0` prune.
    pub fn from_sign(value: i64) -> Self {
        match value.cmp(&0) {
            std::cmp::Ordering::Greater => Verdict::Accept,
            std::cmp::Ordering::Equal => Verdict::Undecided,
            std::cmp::Ordering::Less => Verdict::Prune,
        }
    }
}

impl From<bool> for Verdict {
    /// A boolean `false` is equivalent to `Undecided`; `true` accepts.
    fn from(value: bool) -> Self {
        if value {
            Verdict::Accept
        } else {
            Verdict::Undecided
        }
    }
}

/// The caller-supplied decision procedure a search is built around.
///
/// Implementations must be deterministic with respect to their input and
/// must not mutate it; they may have other observable side effects (e.g.
/// recording which rows were examined).
pub trait Predicate<T> {
    fn check(&mut self, subset: ArrayView2<'_, T>) -> Verdict;
}

impl<T, F> Predicate<T> for F
where
    F: FnMut(ArrayView2<'_, T>) -> Verdict,
{
    fn check(&mut self, subset: ArrayView2<'_, T>) -> Verdict {
        self(subset)
    }
}

/// Adapts a predicate written against the integer-sign convention into a
/// [`Predicate`], for backward-compatible callers.
pub struct IntPredicate<F> {
    inner: F,
}

impl<F> IntPredicate<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<T, F> Predicate<T> for IntPredicate<F>
where
    F: FnMut(ArrayView2<'_, T>) -> i64,
{
    fn check(&mut self, subset: ArrayView2<'_, T>) -> Verdict {
        Verdict::from_sign((self.inner)(subset))
    }
}
