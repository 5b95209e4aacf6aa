//! `fukubiki`: weighted discrete sampling.
//!
//! Given a fixed set of distinct values and their relative weights, repeatedly draw
//! values so that each one's long-run frequency converges to its share of the total
//! weight. One uniform draw per sample, mapped through precomputed cumulative weights
//! by binary search.
//!
//! Exposed modules:
//! - `cumulative`: the validated, immutable table (`CumulativeWeights`) and its errors.
//! - `sampler`: `WeightedSampler`, a table plus an owned generator.
//! - `shared`: `SharedSampler`, a table plus a mutex-guarded generator for `&self` draws.
//!
//! ```
//! use fukubiki::WeightedSampler;
//!
//! let mut sampler = WeightedSampler::new([1, 2, 3], [0.2, 0.3, 0.5]).unwrap();
//! let x = sampler.draw();
//! assert!((1..=3).contains(&x));
//! ```

#![forbid(unsafe_code)]

pub mod cumulative;
pub mod sampler;
pub mod shared;

pub use cumulative::{ConstructionError, CumulativeWeights};
pub use sampler::WeightedSampler;
pub use shared::SharedSampler;
