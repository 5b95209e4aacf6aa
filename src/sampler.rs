//! Weighted sampling with an owned random source.
//!
//! [`WeightedSampler`] pairs a [`CumulativeWeights`] table with the generator that
//! drives it. Each draw consumes exactly one `f64` from the generator.
//!
//! Notes:
//! - [`WeightedSampler::new`] seeds from the OS and is not reproducible across runs.
//!   Use [`WeightedSampler::with_seed`] or [`WeightedSampler::with_rng`] where
//!   determinism matters (tests/benches).
//! - Draws need `&mut self` because they advance the generator. For draws through a
//!   shared reference see [`crate::SharedSampler`].

use std::hash::Hash;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cumulative::{ConstructionError, CumulativeWeights};

/// Draws values with probability proportional to their weights.
///
/// ```
/// use fukubiki::WeightedSampler;
///
/// let mut sampler = WeightedSampler::with_seed(["win", "lose"], [1.0, 9.0], 7).unwrap();
/// let outcome = sampler.draw();
/// assert!(outcome == "win" || outcome == "lose");
/// ```
#[derive(Debug, Clone)]
pub struct WeightedSampler<V, R = StdRng> {
    table: CumulativeWeights<V>,
    rng: R,
}

impl<V: Eq + Hash> WeightedSampler<V, StdRng> {
    /// Build a sampler whose generator is seeded from the OS.
    pub fn new<I, W>(values: I, weights: W) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = V>,
        W: IntoIterator,
        W::Item: Into<f64>,
    {
        Self::with_rng(values, weights, StdRng::from_os_rng())
    }

    /// Build a sampler with a reproducible, seeded generator.
    pub fn with_seed<I, W>(values: I, weights: W, seed: u64) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = V>,
        W: IntoIterator,
        W::Item: Into<f64>,
    {
        Self::with_rng(values, weights, StdRng::seed_from_u64(seed))
    }
}

impl<V: Eq + Hash, R: Rng> WeightedSampler<V, R> {
    /// Build a sampler around a caller-supplied generator.
    pub fn with_rng<I, W>(values: I, weights: W, rng: R) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = V>,
        W: IntoIterator,
        W::Item: Into<f64>,
    {
        Ok(Self::from_table(CumulativeWeights::new(values, weights)?, rng))
    }
}

impl<V, R: Rng> WeightedSampler<V, R> {
    /// Wrap an already validated table.
    pub fn from_table(table: CumulativeWeights<V>, rng: R) -> Self {
        Self { table, rng }
    }

    /// Index of the next drawn value.
    #[inline]
    pub fn draw_index(&mut self) -> usize {
        self.table.sample_index(&mut self.rng)
    }

    /// Borrow the next drawn value.
    #[inline]
    pub fn draw_ref(&mut self) -> &V {
        let i = self.draw_index();
        &self.table.values()[i]
    }

    /// The underlying table.
    pub fn table(&self) -> &CumulativeWeights<V> {
        &self.table
    }

    /// Split into table and generator.
    pub fn into_parts(self) -> (CumulativeWeights<V>, R) {
        (self.table, self.rng)
    }
}

impl<V: Clone, R: Rng> WeightedSampler<V, R> {
    /// Draw one value.
    #[inline]
    pub fn draw(&mut self) -> V {
        self.draw_ref().clone()
    }
}

/// An endless stream of draws.
impl<V: Clone, R: Rng> Iterator for WeightedSampler<V, R> {
    type Item = V;

    #[inline]
    fn next(&mut self) -> Option<V> {
        Some(self.draw())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
