use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};

/// The single logical random stream a search draws from.
///
/// Every primitive a search needs — dimension choice, split point, and the
/// exponential draw behind the biased selector — goes through this type, in a
/// fixed call order dictated by the traversal engine, so that (seed, inputs,
/// configuration) fully determines the search trajectory.
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Deterministic stream from an explicit seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Stream seeded from OS entropy, for callers that don't need
    /// reproducibility.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform integer in `[0, n)`.
    pub fn uniform_index(&mut self, n: usize) -> usize {
        debug_assert!(n > 0, "uniform_index called with an empty range");
        self.rng.gen_range(0..n)
    }

    /// Uniform real in `[lo, hi]` (endpoints included).
    pub fn uniform_real(&mut self, lo: f64, hi: f64) -> f64 {
        if lo == hi {
            return lo;
        }
        debug_assert!(lo < hi, "uniform_real called with lo > hi");
        self.rng.gen_range(lo..=hi)
    }

    /// Exponential draw with rate `lambda`.
    pub fn exponential(&mut self, lambda: f64) -> f64 {
        Exp::new(lambda)
            .expect("exponential rate must be finite and positive")
            .sample(&mut self.rng)
    }
}
