//! Register array of the estimator.
//!
//! One `u8` per register. A register holds the highest rank routed to it,
//! where rank is the 1-based position of the first set bit in the
//! `64 - b` hash bits left over after indexing. Zero means the register
//! has not been touched yet.

use std::mem::size_of_val;

#[derive(Clone)]
pub(crate) struct Registers {
    data: Box<[u8]>,
}

impl Registers {
    /// Create `2^index_bits` zeroed registers
    #[inline]
    pub(crate) fn new(index_bits: u32) -> Self {
        Self {
            data: vec![0u8; 1 << index_bits].into_boxed_slice(),
        }
    }

    /// Number of registers
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Raise register `idx` to `new_rank` if it is currently lower
    #[inline]
    pub(crate) fn update(&mut self, idx: usize, new_rank: u8) {
        let old_rank = &mut self.data[idx];
        *old_rank = (*old_rank).max(new_rank);
    }

    /// Sum of `2^-rank` over all registers
    #[inline]
    pub(crate) fn harmonic_sum(&self) -> f64 {
        self.data
            .iter()
            .map(|&rank| (-f64::from(rank)).exp2())
            .sum()
    }

    /// Heap memory used by the registers
    #[inline]
    pub(crate) fn size_of(&self) -> usize {
        size_of_val(&*self.data)
    }
}

/// Split `hash` into register index (low `index_bits` bits) and rank of the
/// remaining `64 - index_bits` bits.
#[inline]
pub(crate) fn index_and_rank(hash: u64, index_bits: u32) -> (usize, u8) {
    let width = 64 - index_bits;
    let idx = (hash & ((1u64 << index_bits) - 1)) as usize;
    let remainder = hash >> index_bits;
    // `remainder` has its top `index_bits` bits cleared by the shift
    let leading_zeros = remainder.leading_zeros() - index_bits;
    let rank = (leading_zeros + 1).min(width);
    (idx, rank as u8)
}

/// Parameter for bias correction
#[inline]
pub(crate) fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (m as f64)),
    }
}
