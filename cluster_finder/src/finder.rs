use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::dimension::{DimensionSelector, UniformSelector};
use crate::error::{ConfigError, FinderError, ShapeError};
use crate::predicate::Predicate;
use crate::rng::RandomSource;
use crate::traversal::traverse;

/// Serializable summary of a [`FinderConfig::search`] call.
///
/// `Array1<bool>` isn't `Serialize` without enabling `ndarray`'s `serde`
/// feature, which this workspace doesn't turn on; callers who want to log or
/// snapshot a search result reach for this plain-`Vec` wrapper instead of
/// `search`'s `ndarray` return type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinderOutcome {
    /// `Some(bitmap)` on predicate acceptance; `None` if the search
    /// exhausted its iteration budget without accepting.
    pub bitmap: Option<Vec<bool>>,
}

impl From<Option<Array1<bool>>> for FinderOutcome {
    fn from(bitmap: Option<Array1<bool>>) -> Self {
        Self {
            bitmap: bitmap.map(|b| b.to_vec()),
        }
    }
}

/// Immutable search configuration produced by [`FinderConfigBuilder::build`].
///
/// Bundles the predicate together with the size/depth bounds and strategy
/// choices that stay fixed across repeated invocations of [`Self::search`]
/// against different `DP`/`NDP` pairs or seeds.
pub struct FinderConfig<T> {
    check: Box<dyn Predicate<T>>,
    min_count: usize,
    max_count: Option<usize>,
    max_depth: Option<usize>,
    dimension_selector: Box<dyn DimensionSelector>,
    fixed_dimensional_parameters: Option<usize>,
    fixed_non_dimensional_parameters: Option<usize>,
    fixed_n: Option<usize>,
    verbose: bool,
}

/// Builds a [`FinderConfig`]. See field docs on the builder methods below for
/// the available options.
pub struct FinderConfigBuilder<T> {
    check: Box<dyn Predicate<T>>,
    min_count: usize,
    max_count: Option<usize>,
    max_depth: Option<usize>,
    dimension_selector: Box<dyn DimensionSelector>,
    fixed_dimensional_parameters: Option<usize>,
    fixed_non_dimensional_parameters: Option<usize>,
    fixed_n: Option<usize>,
    verbose: bool,
}

impl<T> FinderConfigBuilder<T> {
    /// Starts a builder around the given predicate, with the defaults:
    /// `min_count = 1`, `max_count` unbounded, `max_depth` computed from `N`
    /// at search time, uniform dimension selection, no shape assertions, not
    /// verbose.
    pub fn new<P>(check: P) -> Self
    where
        P: Predicate<T> + 'static,
    {
        Self {
            check: Box::new(check),
            min_count: 1,
            max_count: None,
            max_depth: None,
            dimension_selector: Box::new(UniformSelector),
            fixed_dimensional_parameters: None,
            fixed_non_dimensional_parameters: None,
            fixed_n: None,
            verbose: false,
        }
    }

    pub fn min_count(mut self, min_count: usize) -> Self {
        self.min_count = min_count;
        self
    }

    pub fn max_count(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }

    /// Hard cap on search depth (`H`). Validated at [`Self::build`]: must be
    /// `>= 2`. Left unset, the cap is computed per-search as
    /// `1 + floor(log2(N))`.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn dimension_selector<S>(mut self, selector: S) -> Self
    where
        S: DimensionSelector + 'static,
    {
        self.dimension_selector = Box::new(selector);
        self
    }

    /// Asserts `DP` has exactly this many dimensions (`D`) at search time.
    pub fn fixed_dimensional_parameters(mut self, expected: usize) -> Self {
        self.fixed_dimensional_parameters = Some(expected);
        self
    }

    /// Asserts `NDP` has exactly this many payload columns (`M`) at search
    /// time.
    pub fn fixed_non_dimensional_parameters(mut self, expected: usize) -> Self {
        self.fixed_non_dimensional_parameters = Some(expected);
        self
    }

    /// Asserts both matrices have exactly this many rows (`N`) at search
    /// time.
    pub fn fixed_n(mut self, expected: usize) -> Self {
        self.fixed_n = Some(expected);
        self
    }

    /// Emits an `eprintln!` trace of each traversal step.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validates the configuration and produces an immutable [`FinderConfig`].
    ///
    /// The only config-time (as opposed to search-time) check this performs
    /// itself is `max_depth >= 2`; the exponential-selector rate conflict is
    /// caught earlier, at [`crate::ExponentialBiasedSelector::new`].
    pub fn build(self) -> Result<FinderConfig<T>, FinderError> {
        if let Some(max_depth) = self.max_depth {
            if max_depth < 2 {
                return Err(FinderError::Config(ConfigError::MaxDepthTooSmall { max_depth }));
            }
        }

        Ok(FinderConfig {
            check: self.check,
            min_count: self.min_count,
            max_count: self.max_count,
            max_depth: self.max_depth,
            dimension_selector: self.dimension_selector,
            fixed_dimensional_parameters: self.fixed_dimensional_parameters,
            fixed_non_dimensional_parameters: self.fixed_non_dimensional_parameters,
            fixed_n: self.fixed_n,
            verbose: self.verbose,
        })
    }
}

impl<T: Clone> FinderConfig<T> {
    /// Runs one search over `dp`/`ndp`. Returns `Ok(Some(bitmap))` on
    /// predicate acceptance, `Ok(None)` if `iterations` was exhausted without
    /// an accept, and `Err` on a shape violation caught before the search
    /// starts.
    ///
    /// `random_seed` re-seeds the random source for this invocation only;
    /// with no seed, the stream draws from OS entropy and the trajectory is
    /// not reproducible. `iterations` bounds the number of root-to-exhaustion
    /// restarts; left unset, a predicate that never accepts runs forever.
    pub fn search(
        &mut self,
        dp: ArrayView2<'_, f64>,
        ndp: ArrayView2<'_, T>,
        random_seed: Option<u64>,
        iterations: Option<u64>,
    ) -> Result<Option<Array1<bool>>, FinderError> {
        self.validate_shapes(dp, ndp)?;

        let n = dp.ncols();
        let height = self.max_depth.unwrap_or_else(|| default_max_depth(n));

        let mut rng = match random_seed {
            Some(seed) => RandomSource::from_seed(seed),
            None => RandomSource::from_entropy(),
        };

        Ok(traverse(
            dp,
            ndp,
            self.check.as_mut(),
            self.dimension_selector.as_ref(),
            self.min_count,
            self.max_count,
            height,
            &mut rng,
            iterations,
            self.verbose,
        ))
    }

    /// Convenience wrapper around [`Self::search`] for callers that want a
    /// serializable result (e.g. to log or snapshot) instead of the
    /// `ndarray`-typed bitmap.
    pub fn search_outcome(
        &mut self,
        dp: ArrayView2<'_, f64>,
        ndp: ArrayView2<'_, T>,
        random_seed: Option<u64>,
        iterations: Option<u64>,
    ) -> Result<FinderOutcome, FinderError> {
        self.search(dp, ndp, random_seed, iterations).map(FinderOutcome::from)
    }

    fn validate_shapes(&self, dp: ArrayView2<'_, f64>, ndp: ArrayView2<'_, T>) -> Result<(), FinderError> {
        let d = dp.nrows();
        let n = dp.ncols();
        let ndp_n = ndp.nrows();
        let m = ndp.ncols();

        if n != ndp_n {
            return Err(FinderError::Shape(ShapeError::RowCountMismatch {
                dp_rows: n,
                ndp_rows: ndp_n,
            }));
        }

        if let Some(expected) = self.fixed_dimensional_parameters {
            if expected != d {
                return Err(FinderError::Shape(
                    ShapeError::FixedDimensionalParametersMismatch { expected, found: d },
                ));
            }
        }

        if let Some(expected) = self.fixed_non_dimensional_parameters {
            if expected != m {
                return Err(FinderError::Shape(
                    ShapeError::FixedNonDimensionalParametersMismatch { expected, found: m },
                ));
            }
        }

        if let Some(expected) = self.fixed_n {
            if expected != n {
                return Err(FinderError::Shape(ShapeError::FixedNMismatch { expected, found: n }));
            }
        }

        Ok(())
    }
}

/// `1 + floor(log2(N))`, with `N = 0` treated as `N = 1` (both degenerate to
/// a height too small to split, which `traverse` turns into an immediate
/// "no cluster" result).
fn default_max_depth(n: usize) -> usize {
    let n = n.max(1);
    1 + (n as f64).log2().floor() as usize
}
