use crate::error::ConfigError;
use crate::rng::RandomSource;

/// Default relative rate for [`ExponentialBiasedSelector`]: places the
/// pseudo-mean at `D / rel_lambda`.
pub const DEFAULT_REL_LAMBDA: f64 = 4.0;

/// Strategy for choosing which dimension of `DP` to split on next.
pub trait DimensionSelector {
    /// Returns an index in `[0, n_dimensions)`.
    fn choose(&self, rng: &mut RandomSource, n_dimensions: usize) -> usize;
}

/// Uniformly picks any of the `D` dimensions with equal probability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformSelector;

impl DimensionSelector for UniformSelector {
    fn choose(&self, rng: &mut RandomSource, n_dimensions: usize) -> usize {
        rng.uniform_index(n_dimensions)
    }
}

/// Biases dimension choice toward low indices via rejection-sampled
/// exponential draws.
///
/// Exactly one of `lambda` (absolute rate) or `rel_lambda` (rate relative to
/// `D`, i.e. effective rate `rel_lambda / D`) may be set; if neither is set,
/// `rel_lambda` defaults to [`DEFAULT_REL_LAMBDA`].
#[derive(Debug, Clone, Copy)]
pub struct ExponentialBiasedSelector {
    lambda: Option<f64>,
    rel_lambda: Option<f64>,
}

impl ExponentialBiasedSelector {
    /// Absolute exponential rate, independent of `D`.
    pub fn with_lambda(lambda: f64) -> Self {
        Self {
            lambda: Some(lambda),
            rel_lambda: None,
        }
    }

    /// Rate relative to `D`: effective rate is `rel_lambda / D`.
    pub fn with_rel_lambda(rel_lambda: f64) -> Self {
        Self {
            lambda: None,
            rel_lambda: Some(rel_lambda),
        }
    }

    /// Default: `rel_lambda = DEFAULT_REL_LAMBDA`.
    pub fn default_biased() -> Self {
        Self {
            lambda: None,
            rel_lambda: Some(DEFAULT_REL_LAMBDA),
        }
    }

    /// Validating constructor matching the factory-config boundary: fails if
    /// both an absolute and a relative rate are supplied.
    pub fn new(lambda: Option<f64>, rel_lambda: Option<f64>) -> Result<Self, ConfigError> {
        if lambda.is_some() && rel_lambda.is_some() {
            return Err(ConfigError::ConflictingExponentialRates {
                lambda: lambda.unwrap(),
                rel_lambda: rel_lambda.unwrap(),
            });
        }
        Ok(Self { lambda, rel_lambda })
    }

    fn effective_rate(&self, n_dimensions: usize) -> f64 {
        match self.lambda {
            Some(lambda) => lambda,
            None => self.rel_lambda.unwrap_or(DEFAULT_REL_LAMBDA) / n_dimensions as f64,
        }
    }
}

impl DimensionSelector for ExponentialBiasedSelector {
    fn choose(&self, rng: &mut RandomSource, n_dimensions: usize) -> usize {
        let rate = self.effective_rate(n_dimensions);
        loop {
            let v = rng.exponential(rate);
            if (v as usize) < n_dimensions {
                return v as usize;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn conflicting_rates_is_config_error() {
        let err = ExponentialBiasedSelector::new(Some(1.0), Some(2.0)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ConflictingExponentialRates { .. }
        ));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    fn uniform_selector_always_in_range(#[case] seed: u64) {
        let mut rng = RandomSource::from_seed(seed);
        let selector = UniformSelector;
        for _ in 0..200 {
            let d = selector.choose(&mut rng, 7);
            assert!(d < 7);
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    fn exponential_biased_selector_always_in_range(#[case] seed: u64) {
        let mut rng = RandomSource::from_seed(seed);
        let selector = ExponentialBiasedSelector::default_biased();
        for _ in 0..500 {
            let d = selector.choose(&mut rng, 13);
            assert!(d < 13);
        }
    }
}
