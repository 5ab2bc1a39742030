//! `hll-estimator` is a Rust crate designed to estimate the number of distinct elements in a stream or dataset
//! using a fixed amount of memory chosen from a target accuracy.
//!
//! ```
//! use hll_estimator::Estimator;
//!
//! let mut estimator = Estimator::with_accuracy(90.0).unwrap();
//! for i in 0u32..1000 {
//!     estimator.observe(&i.to_le_bytes()).unwrap();
//! }
//! assert!(estimator.estimate() > 0);
//! ```
pub mod error;
pub mod estimator;
pub mod hash;
mod registers;

pub use error::EstimatorError;
pub use estimator::{index_bits, Config, Estimator, DEFAULT_ACCURACY, MAX_INDEX_BITS};
pub use hash::{BuiltinHash, Fnv1a, HashFunction, StdHash, WyHash64};
