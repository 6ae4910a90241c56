use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::dimension::DimensionSelector;
use crate::rng::RandomSource;

/// Depth-indexed ancestry of active sets.
///
/// `rows[0]` is always all-true (the root); `rows[L]` for `L > 0` holds the
/// active set at depth `L`. The invariant `rows[L][i] => rows[L-1][i]` holds
/// after every produce/flip step.
pub struct BitmapStack {
    bits: Array2<bool>,
}

impl BitmapStack {
    /// `height` = `max_depth`, `n` = row count.
    pub fn new(height: usize, n: usize) -> Self {
        let mut bits = Array2::from_elem((height, n), false);
        bits.row_mut(0).fill(true);
        Self { bits }
    }

    pub fn height(&self) -> usize {
        self.bits.nrows()
    }

    pub fn row(&self, level: usize) -> ArrayView1<'_, bool> {
        self.bits.row(level)
    }

    pub fn popcount(&self, level: usize) -> usize {
        self.bits.row(level).iter().filter(|b| **b).count()
    }

    /// Clears `B[level]` to all-false (used when a level is exhausted and
    /// the engine unwinds past it).
    pub fn clear(&mut self, level: usize) {
        self.bits.row_mut(level).fill(false);
    }

    /// Indices where `B[level]` is true, in ascending order.
    pub fn active_indices(&self, level: usize) -> Vec<usize> {
        self.bits
            .row(level)
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.then_some(i))
            .collect()
    }

    /// Materializes the predicate's input: the rows of `ndp` selected by
    /// `B[level]`, in ascending original-index order.
    pub fn materialize_subset<T: Clone>(&self, level: usize, ndp: ArrayView2<'_, T>) -> Array2<T> {
        ndp.select(Axis(0), &self.active_indices(level))
    }

    /// Produces `B[level]` from `B[level - 1]` by splitting along `dim`.
    /// Returns the split point drawn, for tracing.
    ///
    /// For each `i` with `B[level-1][i]` true, sets `B[level][i] = (DP[dim, i]
    /// >= t)`; every other `i` is set false. `t` is drawn uniformly from the
    /// range of `DP[dim, ...]` restricted to the active rows at `level - 1`.
    pub fn split_into_child(
        &mut self,
        level: usize,
        parent_level: usize,
        dp: ArrayView2<'_, f64>,
        dim: usize,
        rng: &mut RandomSource,
    ) -> f64 {
        let parent = self.bits.row(parent_level).to_owned();
        let dim_row = dp.row(dim);

        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (i, active) in parent.iter().enumerate() {
            if *active {
                let v = dim_row[i];
                if v < lo {
                    lo = v;
                }
                if v > hi {
                    hi = v;
                }
            }
        }

        let split_point = rng.uniform_real(lo, hi);

        let mut child = self.bits.row_mut(level);
        for (i, active) in parent.iter().enumerate() {
            child[i] = *active && dim_row[i] >= split_point;
        }

        split_point
    }

    /// Complements `B[level]` within the support of `B[parent_level]`: the
    /// union of the two children equals the parent and their intersection is
    /// empty.
    pub fn flip_into_sibling(&mut self, level: usize, parent_level: usize) {
        let parent = self.bits.row(parent_level).to_owned();
        let mut child = self.bits.row_mut(level);
        for (i, active) in parent.iter().enumerate() {
            if *active {
                child[i] = !child[i];
            }
        }
    }

    /// The winning bitmap as an owned boolean vector, once a search accepts.
    pub fn to_owned_row(&self, level: usize) -> Array1<bool> {
        self.bits.row(level).to_owned()
    }
}

/// Picks a dimension via `selector` and writes the child bitmap at `level`.
/// Thin wrapper kept separate from [`BitmapStack::split_into_child`] so the
/// dimension choice itself is traceable independently of the split point.
pub fn produce_left_child(
    stack: &mut BitmapStack,
    level: usize,
    dp: ArrayView2<'_, f64>,
    selector: &dyn DimensionSelector,
    rng: &mut RandomSource,
) -> (usize, f64) {
    let n_dimensions = dp.nrows();
    let dim = selector.choose(rng, n_dimensions);
    let split_point = stack.split_into_child(level, level - 1, dp, dim, rng);
    (dim, split_point)
}

/// The per-level branch counter.
///
/// `Produce` (0): the left branch hasn't been produced yet — split.
/// `Flip` (1): the left branch was produced and explored — flip to the
/// sibling. `Exhausted` (2): both children done — unwind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchState {
    Produce,
    Flip,
    Exhausted,
}

impl BranchState {
    fn advance(self) -> Self {
        match self {
            BranchState::Produce => BranchState::Flip,
            BranchState::Flip => BranchState::Exhausted,
            BranchState::Exhausted => BranchState::Exhausted,
        }
    }
}

pub struct BranchStack {
    states: Vec<BranchState>,
}

impl BranchStack {
    pub fn new(height: usize) -> Self {
        Self {
            states: vec![BranchState::Produce; height],
        }
    }

    pub fn get(&self, level: usize) -> BranchState {
        self.states[level]
    }

    /// Advances `R[level]` to the next state (`Produce -> Flip -> Exhausted`).
    pub fn advance(&mut self, level: usize) {
        self.states[level] = self.states[level].advance();
    }

    /// Resets `R[level]` back to `Produce`, as happens when unwinding past an
    /// exhausted level.
    pub fn reset(&mut self, level: usize) {
        self.states[level] = BranchState::Produce;
    }
}
