use thiserror::Error;

/// Errors returned by `Estimator` construction and observation.
#[derive(Debug, Error)]
pub enum EstimatorError {
    /// Accuracy outside of the open `(0, 100)` interval (or NaN).
    #[error("accuracy must be strictly between 0 and 100, got {0}")]
    InvalidAccuracy(f64),
    /// Accuracy is valid but would need more than `2^MAX_INDEX_BITS` registers.
    #[error("accuracy {accuracy} requires 2^{index_bits} registers, which exceeds the supported maximum")]
    TooManyRegisters { accuracy: f64, index_bits: u32 },
    /// Writing an element into the hash function failed.
    #[error("failed to hash element")]
    HashFailure(#[from] std::io::Error),
}
