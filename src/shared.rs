//! Thread-shared weighted sampling.
//!
//! [`SharedSampler`] keeps one generator behind a [`Mutex`] so draws work through
//! `&self` from any number of threads. Generating the uniform and mapping it to an
//! index both happen under the lock, so every draw follows the weight law exactly.
//!
//! Under heavy contention prefer one [`crate::WeightedSampler`] per thread, each with
//! its own seed, sharing a cloned [`CumulativeWeights`].

use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cumulative::{ConstructionError, CumulativeWeights};
use crate::sampler::WeightedSampler;

/// A weighted sampler that can be drawn from through a shared reference.
#[derive(Debug)]
pub struct SharedSampler<V, R = StdRng> {
    table: CumulativeWeights<V>,
    rng: Mutex<R>,
}

impl<V: Eq + Hash> SharedSampler<V, StdRng> {
    /// Build a shared sampler whose generator is seeded from the OS.
    pub fn new<I, W>(values: I, weights: W) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = V>,
        W: IntoIterator,
        W::Item: Into<f64>,
    {
        Self::with_rng(values, weights, StdRng::from_os_rng())
    }

    /// Build a shared sampler with a seeded generator.
    ///
    /// Each draw is reproducible only if the order in which threads take the lock is.
    pub fn with_seed<I, W>(values: I, weights: W, seed: u64) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = V>,
        W: IntoIterator,
        W::Item: Into<f64>,
    {
        Self::with_rng(values, weights, StdRng::seed_from_u64(seed))
    }
}

impl<V: Eq + Hash, R: Rng> SharedSampler<V, R> {
    /// Build a shared sampler around a caller-supplied generator.
    pub fn with_rng<I, W>(values: I, weights: W, rng: R) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = V>,
        W: IntoIterator,
        W::Item: Into<f64>,
    {
        Ok(Self::from_table(CumulativeWeights::new(values, weights)?, rng))
    }
}

impl<V, R: Rng> SharedSampler<V, R> {
    /// Wrap an already validated table.
    pub fn from_table(table: CumulativeWeights<V>, rng: R) -> Self {
        Self {
            table,
            rng: Mutex::new(rng),
        }
    }

    // A panic elsewhere cannot leave the generator half-updated, so poison is ignored.
    fn rng(&self) -> MutexGuard<'_, R> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Index of the next drawn value.
    pub fn draw_index(&self) -> usize {
        let mut rng = self.rng();
        self.table.sample_index(&mut *rng)
    }

    /// Borrow the next drawn value.
    pub fn draw_ref(&self) -> &V {
        &self.table.values()[self.draw_index()]
    }

    /// The underlying table.
    pub fn table(&self) -> &CumulativeWeights<V> {
        &self.table
    }

    /// Split into table and generator.
    pub fn into_parts(self) -> (CumulativeWeights<V>, R) {
        let rng = self.rng.into_inner().unwrap_or_else(PoisonError::into_inner);
        (self.table, rng)
    }
}

impl<V: Clone, R: Rng> SharedSampler<V, R> {
    /// Draw one value.
    pub fn draw(&self) -> V {
        self.draw_ref().clone()
    }
}

impl<V, R: Rng> From<WeightedSampler<V, R>> for SharedSampler<V, R> {
    fn from(sampler: WeightedSampler<V, R>) -> Self {
        let (table, rng) = sampler.into_parts();
        Self::from_table(table, rng)
    }
}
