//! Cardinality estimator allows to estimate number of distinct elements
//! in the stream or dataset and is defined by a target `accuracy` percentage:
//! - `accuracy` in the open `(0, 100)` range, the relative error targeted by
//!   the estimate is `(100 - accuracy) / 100`.
//!
//! # Parameters
//!
//! The standard error of a HyperLogLog estimate with `m` registers is
//! `1.04 / sqrt(m)`. Solving for `m` and taking `log2` gives the number of
//! hash bits used to select a register:
//!
//! `b = round(log2((1.04 / ((100 - accuracy) / 100))^2))`, `m = 2^b`
//!
//! - accuracy 70: b = 4, m = 16, expected error 26%
//! - accuracy 90: b = 7, m = 128, expected error 9.2%
//! - accuracy 99: b = 13, m = 8192, expected error 1.15%
//!
//! # Insertion
//! Every element is hashed into 64 bits and finalized with `fmix64`. The low `b` bits select the register,
//! the remaining `64 - b` bits give the rank (1-based position of the first set bit).
//! Registers only ever grow.
//!
//! # Estimation
//! `E = alpha_m * m^2 / sum(2^-register)`, rounded to the nearest integer.
//! No small-range or large-range correction is applied, so the estimate of an
//! empty estimator is `round(alpha_m * m)` rather than zero.
//!
//! [Original HyperLogLog paper](https://algo.inria.fr/flajolet/Publications/FlFuGaMe07.pdf)

use std::fmt::{Debug, Formatter};
use std::mem::size_of;

use tracing::debug;

use crate::error::EstimatorError;
use crate::hash::{fmix64, Fnv1a, HashFunction};
use crate::registers::{alpha, index_and_rank, Registers};

/// Accuracy used when none is configured
pub const DEFAULT_ACCURACY: f64 = 70.0;
/// Index bits derived from `DEFAULT_ACCURACY`
const DEFAULT_INDEX_BITS: u32 = 4;
/// Largest supported number of index bits (2^30 registers, 1 GiB)
pub const MAX_INDEX_BITS: u32 = 30;

/// Number of index bits derived from `accuracy`, rounded to nearest.
///
/// Returns `None` when `accuracy` is not strictly between 0 and 100.
pub fn index_bits(accuracy: f64) -> Option<u32> {
    if !(accuracy > 0.0 && accuracy < 100.0) {
        return None;
    }
    let relative_error = (100.0 - accuracy) / 100.0;
    let bits = (1.04 / relative_error).powi(2).log2().round();
    // `1.04 / relative_error > 1`, so `bits` is never negative
    Some(bits.min(f64::from(u32::MAX)) as u32)
}

/// Construction options of an `Estimator`
#[derive(Clone)]
pub struct Config<H = Fnv1a> {
    /// Target accuracy in percent, strictly between 0 and 100
    pub accuracy: f64,
    /// Hash function used to route elements into registers
    pub hash_function: H,
    /// Optional salt hashed in front of every element
    pub seed: Option<u64>,
}

impl Default for Config<Fnv1a> {
    fn default() -> Self {
        Self {
            accuracy: DEFAULT_ACCURACY,
            hash_function: Fnv1a::default(),
            seed: None,
        }
    }
}

impl<H: HashFunction> Config<H> {
    /// Set target accuracy
    pub fn accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Replace the hash function
    pub fn hash_function<G: HashFunction>(self, hash_function: G) -> Config<G> {
        Config {
            accuracy: self.accuracy,
            hash_function,
            seed: self.seed,
        }
    }

    /// Salt every element with a fixed `seed`
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build an `Estimator` from this configuration
    pub fn build(self) -> Result<Estimator<H>, EstimatorError> {
        Estimator::new(self)
    }
}

/// HyperLogLog estimator with a register count derived from a target accuracy.
///
/// Not synchronized: share it between threads only behind a lock.
#[derive(Clone)]
pub struct Estimator<H = Fnv1a> {
    hash_function: H,
    seed: Option<u64>,
    accuracy: f64,
    index_bits: u32,
    alpha: f64,
    registers: Registers,
}

impl Estimator<Fnv1a> {
    /// Creates new `Estimator` with given `accuracy` and the default hash function
    pub fn with_accuracy(accuracy: f64) -> Result<Self, EstimatorError> {
        Self::new(Config::default().accuracy(accuracy))
    }
}

impl Default for Estimator<Fnv1a> {
    fn default() -> Self {
        Self::from_parts(Config::default(), DEFAULT_INDEX_BITS)
    }
}

impl<H: HashFunction> Estimator<H> {
    /// Creates new instance of `Estimator` from `config`
    pub fn new(config: Config<H>) -> Result<Self, EstimatorError> {
        let accuracy = config.accuracy;
        let index_bits = index_bits(accuracy).ok_or(EstimatorError::InvalidAccuracy(accuracy))?;
        if index_bits > MAX_INDEX_BITS {
            return Err(EstimatorError::TooManyRegisters {
                accuracy,
                index_bits,
            });
        }
        Ok(Self::from_parts(config, index_bits))
    }

    fn from_parts(config: Config<H>, index_bits: u32) -> Self {
        let registers = Registers::new(index_bits);
        let alpha = alpha(registers.len());
        debug!(
            accuracy = config.accuracy,
            index_bits,
            registers = registers.len(),
            alpha,
            "created estimator"
        );
        Self {
            hash_function: config.hash_function,
            seed: config.seed,
            accuracy: config.accuracy,
            index_bits,
            alpha,
            registers,
        }
    }

    /// Observe an element given as raw bytes.
    ///
    /// Registers are left untouched if hashing fails.
    #[inline]
    pub fn observe(&mut self, element: &[u8]) -> Result<(), EstimatorError> {
        let hash = self.hash(element)?;
        self.insert_hash(hash);
        Ok(())
    }

    /// Insert a precomputed 64-bit hash.
    ///
    /// The hash is used as is, so it must already be well mixed.
    #[inline]
    pub fn insert_hash(&mut self, hash: u64) {
        let (idx, rank) = index_and_rank(hash, self.index_bits);
        self.registers.update(idx, rank);
    }

    #[inline]
    fn hash(&mut self, element: &[u8]) -> Result<u64, EstimatorError> {
        self.hash_function.reset();
        if let Some(seed) = self.seed {
            self.hash_function.write(&seed.to_le_bytes())?;
        }
        self.hash_function.write(element)?;
        Ok(fmix64(self.hash_function.finish()))
    }

    /// Return cardinality estimate
    #[inline]
    pub fn estimate(&self) -> usize {
        let m = self.registers.len() as f64;
        // every term is positive, so the sum is never zero
        let sum = self.registers.harmonic_sum();
        let estimate = self.alpha * m * m / sum;
        (estimate + 0.5) as usize
    }
}

impl<H> Estimator<H> {
    /// Target accuracy in percent
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Number of hash bits used to select a register
    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Number of registers, `2^index_bits`
    pub fn register_count(&self) -> usize {
        self.registers.len()
    }

    /// Bias correction constant for the register count
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Salt hashed in front of every element, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Current register values
    pub fn registers(&self) -> &[u8] {
        self.registers.as_slice()
    }

    /// Return memory size of `Estimator`
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + self.registers.size_of()
    }
}

impl<H: HashFunction> Debug for Estimator<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ accuracy: {}, registers: {}, estimate: {}, size: {} }}",
            self.accuracy,
            self.register_count(),
            self.estimate(),
            self.size_of()
        )
    }
}
