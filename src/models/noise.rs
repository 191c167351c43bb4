//! Random sources for the models
//!
//! Every stochastic draw of the simulation goes through a [`NoiseSource`], so
//! a run can be reproduced from a seed or made fully deterministic in tests.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Source of every random draw made by the models
pub trait NoiseSource: fmt::Debug {
    /// Uniform draw from `[low, high)`; returns `low` when the range is empty
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Bernoulli trial; `probability` is clamped to `[0, 1]`
    fn chance(&mut self, probability: f64) -> bool;

    /// Index drawn proportionally to `weights`
    fn weighted_index(&mut self, weights: &[u32]) -> usize;
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (**self).uniform(low, high)
    }

    fn chance(&mut self, probability: f64) -> bool {
        (**self).chance(probability)
    }

    fn weighted_index(&mut self, weights: &[u32]) -> usize {
        (**self).weighted_index(weights)
    }
}

/// Pseudo-random source backed by [`StdRng`]
pub struct SeededNoise {
    rng: StdRng,
    seed: Option<u64>,
}

impl fmt::Debug for SeededNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeededNoise").field("seed", &self.seed).finish()
    }
}

impl SeededNoise {
    /// Seeded source when `seed` is set, entropy-based otherwise
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::from_entropy(),
        }
    }

    /// Create a source with a specific seed for reproducible results
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), seed: Some(seed) }
    }

    /// Create an entropy-seeded source
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy(), seed: None }
    }

    /// Seed the source was created with, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl NoiseSource for SeededNoise {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if !(low < high) {
            return low;
        }
        self.rng.gen_range(low..high)
    }

    fn chance(&mut self, probability: f64) -> bool {
        if !(probability > 0.0) {
            return false;
        }
        self.rng.gen_bool(probability.min(1.0))
    }

    fn weighted_index(&mut self, weights: &[u32]) -> usize {
        match WeightedIndex::new(weights) {
            Ok(distribution) => distribution.sample(&mut self.rng),
            Err(_) => 0,
        }
    }
}

/// Deterministic source for tests and calibration
///
/// Uniform draws return the midpoint of their range, so every symmetric noise
/// term is exactly zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenteredNoise {
    detect: bool,
    weighted_pick: usize,
}

impl CenteredNoise {
    /// Midpoint draws, every Bernoulli trial fails, weighted draws pick index 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the outcome of every Bernoulli trial
    pub fn with_detection(mut self, detect: bool) -> Self {
        self.detect = detect;
        self
    }

    /// Set the index returned by weighted draws
    pub fn with_weighted_pick(mut self, index: usize) -> Self {
        self.weighted_pick = index;
        self
    }
}

impl NoiseSource for CenteredNoise {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (low + high) / 2.0
    }

    fn chance(&mut self, _probability: f64) -> bool {
        self.detect
    }

    fn weighted_index(&mut self, weights: &[u32]) -> usize {
        self.weighted_pick.min(weights.len().saturating_sub(1))
    }
}
