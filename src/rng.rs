//! Deterministic PCG-32 stream used inside the Power, Binomial and
//! Memento-one lookup paths.
//!
//! The engines only need a reproducible stream for a given seed: the
//! same `(s1, s2)` pair must yield the same sequence in every process.
//! Lookups construct one of these on the stack per call, so engines
//! stay shareable across threads for reads.

use rand_core::RngCore;
use rand_pcg::Pcg32;

/// Default PCG stream selector, used by single-argument seeding.
const DEFAULT_STREAM: u64 = 0xda3e_39cb_94b9_5bdb;

pub struct DeterministicRng {
    inner: Pcg32,
}

impl DeterministicRng {
    /// Largest value `next` can return, for uniform-(0,1] conversion.
    pub const MAX: u32 = u32::MAX;

    #[inline]
    pub fn from_seed(s1: u64) -> Self {
        Self { inner: Pcg32::new(s1, DEFAULT_STREAM) }
    }

    /// Two-argument seeding: `s1` selects the state, `s2` the stream.
    #[inline]
    pub fn from_seed_pair(s1: u64, s2: u64) -> Self {
        Self { inner: Pcg32::new(s1, s2) }
    }

    #[inline]
    pub fn next(&mut self) -> u32 {
        self.inner.next_u32()
    }

    /// Next draw mapped into (0, 1].
    #[inline]
    pub fn next_unit(&mut self) -> f64 {
        f64::from(self.next()) / f64::from(Self::MAX)
    }
}
