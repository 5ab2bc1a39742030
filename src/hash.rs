//! Hash functions used to route elements into registers.
//!
//! Any `HashFunction` works as long as it is deterministic: the same
//! sequence of writes must always finish to the same 64-bit value.
//! Std hashers plug in through [`StdHash`], which rebuilds its state from a
//! `BuildHasher` on every `reset`.
//!
//! The estimator passes every `finish` value through [`fmix64`] before
//! splitting it into register index and rank, so weakly mixed functions such
//! as FNV-1a still spread sequential or structured keys evenly.

use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasher, BuildHasherDefault, Hasher};
use std::io;

use enum_dispatch::enum_dispatch;
use fnv::FnvBuildHasher;
use wyhash::WyHash;

/// Default hash function: 64-bit FNV-1a.
pub type Fnv1a = StdHash<FnvBuildHasher>;

/// 64-bit wyhash with the default (zero) seed.
pub type WyHash64 = StdHash<BuildHasherDefault<WyHash>>;

/// Resettable 64-bit hash function fed with raw bytes.
#[enum_dispatch]
pub trait HashFunction {
    /// Discard all bytes written so far.
    fn reset(&mut self);
    /// Absorb `bytes` into the hash state.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;
    /// Return the 64-bit hash of everything written since the last `reset`.
    fn finish(&self) -> u64;
}

/// Adapter exposing a std `BuildHasher` as a `HashFunction`.
pub struct StdHash<B: BuildHasher> {
    build_hasher: B,
    state: B::Hasher,
}

impl<B: BuildHasher> StdHash<B> {
    /// Creates new instance of `StdHash` from given `build_hasher`
    pub fn new(build_hasher: B) -> Self {
        let state = build_hasher.build_hasher();
        Self {
            build_hasher,
            state,
        }
    }
}

impl<B: BuildHasher + Default> Default for StdHash<B> {
    fn default() -> Self {
        Self::new(B::default())
    }
}

impl<B: BuildHasher> HashFunction for StdHash<B> {
    #[inline]
    fn reset(&mut self) {
        self.state = self.build_hasher.build_hasher();
    }

    /// Std hashers cannot fail, so this always returns `Ok`.
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.state.write(bytes);
        Ok(())
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state.finish()
    }
}

impl<B: BuildHasher + Clone> Clone for StdHash<B> {
    /// Clone yields a freshly reset hasher
    fn clone(&self) -> Self {
        Self::new(self.build_hasher.clone())
    }
}

impl<B: BuildHasher> Debug for StdHash<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "StdHash<{}>", std::any::type_name::<B>())
    }
}

/// Hash functions shipped with the crate, selectable at runtime.
#[enum_dispatch(HashFunction)]
#[derive(Clone, Debug)]
pub enum BuiltinHash {
    Fnv1a(Fnv1a),
    WyHash(WyHash64),
}

impl Default for BuiltinHash {
    fn default() -> Self {
        BuiltinHash::Fnv1a(Fnv1a::default())
    }
}

/// MurmurHash3 finalization mix: force all bits of a hash to avalanche.
#[inline]
pub fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^ (k >> 33)
}
