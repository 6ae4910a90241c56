//! Randomized hyper-rectangle partitioning search over a fixed-point matrix
//! pair: `dimensional_parameters` (the axes to split on) and
//! `non_dimensional_parameters` (the payload handed to the caller's
//! predicate).
//!
//! [`FinderConfigBuilder`] builds an immutable [`FinderConfig`], whose
//! [`FinderConfig::search`] runs an iterative, stack-based descent
//! ([`traversal`]) that repeatedly splits the active row set along a
//! randomly chosen dimension ([`dimension`], [`bitmap`]) until the caller's
//! [`Predicate`] accepts a subset or the configured iteration budget is
//! exhausted.

mod bitmap;
mod dimension;
mod error;
mod finder;
mod predicate;
mod rng;
mod traversal;

pub use dimension::{DimensionSelector, ExponentialBiasedSelector, UniformSelector, DEFAULT_REL_LAMBDA};
pub use error::{ConfigError, FinderError, ShapeError};
pub use finder::{FinderConfig, FinderConfigBuilder, FinderOutcome};
pub use predicate::{IntPredicate, Predicate, Verdict};
pub use rng::RandomSource;
