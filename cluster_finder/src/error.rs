use thiserror::Error;

/// Errors surfaced by [`crate::FinderConfigBuilder::build`] and
/// [`crate::FinderConfig::search`].
///
/// `Config` covers mistakes in the static configuration (independent of any
/// particular `DP`/`NDP` pair); `Shape` covers mismatches discovered only once
/// the matrices for a given search are known. Predicate failures are not a
/// variant here: the predicate contract (see [`crate::Predicate`]) returns a
/// [`crate::Verdict`]/signed integer rather than a `Result`, so a predicate
/// that needs to report a hard failure does so through its own side channel
/// (e.g. by panicking), and that panic propagates through `search` unchanged.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "exponential-biased dimension selector given both an absolute rate ({lambda}) and a \
         relative rate ({rel_lambda}); supply at most one"
    )]
    ConflictingExponentialRates { lambda: f64, rel_lambda: f64 },

    #[error("max_depth must be >= 2, got {max_depth}")]
    MaxDepthTooSmall { max_depth: usize },
}

#[derive(Debug, Error)]
pub enum ShapeError {
    #[error(
        "dimensional_parameters has {dp_rows} rows but non_dimensional_parameters has {ndp_rows} \
         rows; the row-count axes must match"
    )]
    RowCountMismatch { dp_rows: usize, ndp_rows: usize },

    #[error(
        "fixed_dimensional_parameters expected {expected} dimensions, dimensional_parameters has \
         {found}"
    )]
    FixedDimensionalParametersMismatch { expected: usize, found: usize },

    #[error(
        "fixed_non_dimensional_parameters expected {expected} columns, \
         non_dimensional_parameters has {found}"
    )]
    FixedNonDimensionalParametersMismatch { expected: usize, found: usize },

    #[error("fixed_n expected {expected} rows, got {found}")]
    FixedNMismatch { expected: usize, found: usize },
}
