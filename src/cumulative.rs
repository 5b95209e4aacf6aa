//! Cumulative-weight tables.
//!
//! A [`CumulativeWeights`] maps one uniform draw onto one of `n` values:
//! scale `u ~ Uniform[0, 1)` by the total weight, then take the first index whose
//! running sum is `>=` the scaled target. Lookup is a binary search, O(log n).
//!
//! The table owns no random source. Pass a generator per call
//! ([`CumulativeWeights::choose`], or the [`Distribution<usize>`] impl), or let
//! [`crate::WeightedSampler`] own one.
//!
//! Notes:
//! - Weights must be finite and non-negative, and must sum to a positive, finite total.
//! - Zero-weight values are accepted but never selected.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use log::debug;
use rand::distr::Distribution;
use rand::Rng;

/// Errors raised while building a table.
///
/// Construction is all-or-nothing: on error no table exists.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConstructionError {
    /// `values` and `weights` differ in length.
    #[error("got {values} values but {weights} weights")]
    LengthMismatch { values: usize, weights: usize },
    /// The value at `index` compares equal to the one at `first`.
    #[error("value at index {index} duplicates the value at index {first}")]
    DuplicateValue { first: usize, index: usize },
    /// Weight is NaN or infinite.
    #[error("weight at index {index} must be finite (got {weight})")]
    NonFiniteWeight { index: usize, weight: f64 },
    /// Weight is below zero.
    #[error("weight at index {index} must be >= 0 (got {weight})")]
    NegativeWeight { index: usize, weight: f64 },
    /// Weights sum to zero (this includes the empty table).
    #[error("total weight must be > 0 (got {0})")]
    NonPositiveTotalWeight(f64),
    /// Finite weights whose sum overflowed.
    #[error("total weight must be finite (got {0})")]
    NonFiniteTotalWeight(f64),
}

/// Values paired with the running sum of their weights.
///
/// Immutable once built. `Clone`, and `Send + Sync` whenever `V` is, so threads can
/// share one table while each drives its own generator.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeWeights<V> {
    values: Vec<V>,
    weights: Vec<f64>,
    cumulative: Vec<f64>,
    total: f64,
}

impl<V: Eq + Hash> CumulativeWeights<V> {
    /// Build a table from positionally aligned `values` and `weights`.
    ///
    /// Checks run in order and the first failure is returned: lengths, duplicate
    /// values, each weight in index order, then the total.
    ///
    /// ```
    /// use fukubiki::CumulativeWeights;
    ///
    /// let table = CumulativeWeights::new([1, 2, 3], [0.2, 0.3, 0.5]).unwrap();
    /// assert_eq!(table.cumulative_weights(), &[0.2, 0.5, 1.0]);
    /// ```
    pub fn new<I, W>(values: I, weights: W) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = V>,
        W: IntoIterator,
        W::Item: Into<f64>,
    {
        let values: Vec<V> = values.into_iter().collect();
        let weights: Vec<f64> = weights.into_iter().map(Into::into).collect();
        Self::build(values, weights)
    }

    /// Build a table from `(value, weight)` pairs.
    pub fn from_pairs<I, W>(pairs: I) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = (V, W)>,
        W: Into<f64>,
    {
        let (values, weights): (Vec<V>, Vec<f64>) =
            pairs.into_iter().map(|(v, w)| (v, w.into())).unzip();
        Self::build(values, weights)
    }

    fn build(values: Vec<V>, weights: Vec<f64>) -> Result<Self, ConstructionError> {
        let (cumulative, total) = validate(&values, &weights)
            .inspect_err(|err| debug!("rejected weighted table: {err}"))?;

        debug!(
            "built weighted table over {} values (total weight {total})",
            values.len()
        );

        Ok(Self {
            values,
            weights,
            cumulative,
            total,
        })
    }
}

fn validate<V: Eq + Hash>(
    values: &[V],
    weights: &[f64],
) -> Result<(Vec<f64>, f64), ConstructionError> {
    if values.len() != weights.len() {
        return Err(ConstructionError::LengthMismatch {
            values: values.len(),
            weights: weights.len(),
        });
    }

    let mut seen: HashMap<&V, usize> = HashMap::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        match seen.entry(value) {
            Entry::Occupied(e) => {
                return Err(ConstructionError::DuplicateValue {
                    first: *e.get(),
                    index,
                })
            }
            Entry::Vacant(e) => {
                e.insert(index);
            }
        }
    }

    let mut cumulative = Vec::with_capacity(weights.len());
    let mut total = 0.0_f64;
    for (index, &weight) in weights.iter().enumerate() {
        if !weight.is_finite() {
            return Err(ConstructionError::NonFiniteWeight { index, weight });
        }
        if weight < 0.0 {
            return Err(ConstructionError::NegativeWeight { index, weight });
        }
        total += weight;
        cumulative.push(total);
    }

    if total <= 0.0 {
        return Err(ConstructionError::NonPositiveTotalWeight(total));
    }
    if !total.is_finite() {
        return Err(ConstructionError::NonFiniteTotalWeight(total));
    }

    Ok((cumulative, total))
}

impl<V> CumulativeWeights<V> {
    /// Map a uniform `u` in `[0, 1)` to an index.
    ///
    /// Returns the first index whose cumulative weight is `>= u * total`, so a target
    /// that lands exactly on a boundary goes to the lower bucket. Leading zero-weight
    /// entries (reachable only at `u == 0`) are skipped. Out-of-range `u` is clamped:
    /// `u >= 1` picks the last positive-weight entry, `u <= 0` or NaN the first.
    #[inline]
    pub fn index_at(&self, u: f64) -> usize {
        let target = u * self.total;
        let last = self.cumulative.len() - 1;
        let mut idx = self.cumulative.partition_point(|&c| c < target).min(last);
        while idx < last && self.weights[idx] == 0.0 {
            idx += 1;
        }
        idx
    }

    /// Draw one index using a caller-supplied RNG.
    #[inline]
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.index_at(rng.random::<f64>())
    }

    /// Draw one value using a caller-supplied RNG.
    #[inline]
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &V {
        &self.values[self.sample_index(rng)]
    }

    /// Values in construction order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Weights in construction order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Running sum of the weights; the last entry equals [`Self::total_weight`].
    pub fn cumulative_weights(&self) -> &[f64] {
        &self.cumulative
    }

    /// Sum of all weights. Always `> 0`.
    pub fn total_weight(&self) -> f64 {
        self.total
    }

    /// Number of values. Always `>= 1`.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`: an empty table fails construction.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<V: PartialEq> CumulativeWeights<V> {
    /// Index of `value`, if present. Linear scan.
    pub fn position(&self, value: &V) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    /// Probability that a single draw yields `value` (`0.0` if absent).
    pub fn probability(&self, value: &V) -> f64 {
        self.position(value)
            .map_or(0.0, |i| self.weights[i] / self.total)
    }
}

impl<V> Distribution<usize> for CumulativeWeights<V> {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.sample_index(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rejects_length_mismatch() {
        let err = CumulativeWeights::new([1, 2, 3], Vec::<f64>::new()).expect_err("lengths differ");
        assert_eq!(
            err,
            ConstructionError::LengthMismatch {
                values: 3,
                weights: 0
            }
        );
    }

    #[test]
    fn rejects_zero_total() {
        let err = CumulativeWeights::new([1, 2, 3], [0, 0, 0]).expect_err("zero total");
        assert_eq!(err, ConstructionError::NonPositiveTotalWeight(0.0));
    }

    #[test]
    fn rejects_duplicates() {
        let err = CumulativeWeights::new([1, 2, 2], [1, 1, 1]).expect_err("duplicate");
        assert_eq!(err, ConstructionError::DuplicateValue { first: 1, index: 2 });
    }

    #[test]
    fn rejects_empty_input() {
        let err = CumulativeWeights::<u8>::new([], Vec::<f64>::new()).expect_err("empty");
        assert_eq!(err, ConstructionError::NonPositiveTotalWeight(0.0));
    }

    #[test]
    fn length_is_checked_before_duplicates() {
        let err = CumulativeWeights::new([7, 7], [1.0]).expect_err("both wrong");
        assert!(matches!(err, ConstructionError::LengthMismatch { .. }));
    }

    #[test]
    fn rejects_bad_individual_weights() {
        let err = CumulativeWeights::new(["a", "b"], [1.0, -0.5]).expect_err("negative");
        assert_eq!(
            err,
            ConstructionError::NegativeWeight {
                index: 1,
                weight: -0.5
            }
        );

        let err = CumulativeWeights::new(["a", "b"], [f64::NAN, 1.0]).expect_err("nan");
        assert!(matches!(
            err,
            ConstructionError::NonFiniteWeight { index: 0, weight } if weight.is_nan()
        ));

        let err = CumulativeWeights::new(["a"], [f64::INFINITY]).expect_err("inf");
        assert!(matches!(err, ConstructionError::NonFiniteWeight { index: 0, .. }));
    }

    #[test]
    fn negative_weight_rejected_even_when_total_positive() {
        let err = CumulativeWeights::new([1, 2, 3], [5.0, -1.0, 1.0]).expect_err("negative");
        assert!(matches!(err, ConstructionError::NegativeWeight { index: 1, .. }));
    }

    #[test]
    fn rejects_overflowing_total() {
        let err = CumulativeWeights::new([1, 2], [f64::MAX, f64::MAX]).expect_err("overflow");
        assert_eq!(err, ConstructionError::NonFiniteTotalWeight(f64::INFINITY));
    }

    #[test]
    fn error_messages_name_the_input() {
        let err = ConstructionError::DuplicateValue { first: 0, index: 3 };
        assert_eq!(
            err.to_string(),
            "value at index 3 duplicates the value at index 0"
        );
        let err = ConstructionError::NonPositiveTotalWeight(0.0);
        assert_eq!(err.to_string(), "total weight must be > 0 (got 0)");
    }

    #[test]
    fn cumulative_weights_are_running_sums() {
        let table = CumulativeWeights::new([1, 2, 3], [0.2, 0.3, 0.5]).expect("valid");
        assert_eq!(table.values(), &[1, 2, 3]);
        assert_eq!(table.weights(), &[0.2, 0.3, 0.5]);
        assert_eq!(table.cumulative_weights(), &[0.2, 0.5, 1.0]);
        assert_eq!(table.total_weight(), 1.0);
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
    }

    #[test]
    fn integer_weights_are_accepted() {
        let table = CumulativeWeights::new(["x", "y"], [1u32, 3]).expect("valid");
        assert_eq!(table.cumulative_weights(), &[1.0, 4.0]);
    }

    #[test]
    fn from_pairs_matches_new() {
        let a = CumulativeWeights::from_pairs([("a", 1.0), ("b", 2.0)]).expect("valid");
        let b = CumulativeWeights::new(["a", "b"], [1.0, 2.0]).expect("valid");
        assert_eq!(a, b);

        let err = CumulativeWeights::from_pairs([("a", 1.0), ("a", 2.0)]).expect_err("dup");
        assert_eq!(err, ConstructionError::DuplicateValue { first: 0, index: 1 });
    }

    #[test]
    fn identical_inputs_build_identical_tables() {
        let a = CumulativeWeights::new([10, 20, 30], [3.0, 1.5, 0.25]).expect("valid");
        let b = CumulativeWeights::new([10, 20, 30], [3.0, 1.5, 0.25]).expect("valid");
        assert_eq!(a.cumulative_weights(), b.cumulative_weights());
        assert_eq!(a.total_weight(), b.total_weight());
    }

    #[test]
    fn boundary_target_selects_first_index_reaching_it() {
        // cumulative = [1, 2, 4], total = 4; all products below are exact.
        let table = CumulativeWeights::new(['a', 'b', 'c'], [1.0, 1.0, 2.0]).expect("valid");
        assert_eq!(table.index_at(0.0), 0);
        assert_eq!(table.index_at(0.25), 0);
        assert_eq!(table.index_at(0.5), 1);
        assert_eq!(table.index_at(0.5 + f64::EPSILON), 2);
        assert_eq!(table.index_at(0.999), 2);
    }

    #[test]
    fn out_of_range_uniforms_are_clamped() {
        let table = CumulativeWeights::new([1, 2], [1.0, 1.0]).expect("valid");
        assert_eq!(table.index_at(1.0), 1);
        assert_eq!(table.index_at(7.0), 1);
        assert_eq!(table.index_at(-1.0), 0);
        assert_eq!(table.index_at(f64::NAN), 0);
    }

    #[test]
    fn zero_weight_entries_are_never_selected() {
        let leading = CumulativeWeights::new([1, 2, 3], [0.0, 1.0, 1.0]).expect("valid");
        assert_eq!(leading.index_at(0.0), 1);
        assert_eq!(leading.index_at(f64::NAN), 1);

        // cumulative = [1, 1, 2]; the boundary at 1 belongs to index 0.
        let middle = CumulativeWeights::new([1, 2, 3], [1.0, 0.0, 1.0]).expect("valid");
        assert_eq!(middle.index_at(0.5), 0);
        assert_eq!(middle.index_at(0.75), 2);

        let trailing = CumulativeWeights::new([1, 2, 3], [1.0, 1.0, 0.0]).expect("valid");
        assert_eq!(trailing.index_at(0.999), 1);
        assert_eq!(trailing.index_at(1.0), 1);
    }

    #[test]
    fn probability_is_weight_share() {
        let table = CumulativeWeights::new(["a", "b", "c"], [1.0, 1.0, 2.0]).expect("valid");
        assert_eq!(table.probability(&"c"), 0.5);
        assert_eq!(table.probability(&"a"), 0.25);
        assert_eq!(table.probability(&"z"), 0.0);
        assert_eq!(table.position(&"b"), Some(1));
        assert_eq!(table.position(&"z"), None);
    }

    #[test]
    fn distribution_impl_draws_indices() {
        let table = CumulativeWeights::new([1, 2, 3], [0.0, 3.0, 1.0]).expect("valid");
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut counts = [0usize; 3];
        for _ in 0..4_000 {
            let i: usize = rng.sample(&table);
            counts[i] += 1;
        }
        assert_eq!(counts[0], 0);
        assert!(counts[1] > counts[2] * 2, "counts={counts:?}");
    }

    #[test]
    fn choose_returns_member() {
        let table = CumulativeWeights::new(["x", "y"], [1.0, 1.0]).expect("valid");
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..100 {
            let v = table.choose(&mut rng);
            assert!(table.values().contains(v));
        }
    }
}
