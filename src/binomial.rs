//! BinomialHash: the bucket space is a binary tree of power-of-two
//! levels. A key hashes into the upper tree, gets relocated uniformly
//! inside its level, and falls back across levels when it lands above
//! the working set.

use crate::engine::{Engine, EngineError};
use crate::mix::mix;
use crate::rng::DeterministicRng;

/// Isolates the highest set bit of `i` (0 for 0).
#[inline]
fn highest_one_bit(i: u32) -> u32 {
    if i == 0 { 0 } else { 1 << (31 - i.leading_zeros()) }
}

pub struct BinomialEngine {
    size: u32,
    /// `nextPow2(size) - 1`: mask of the whole tree.
    upper_filter: u32,
    /// `upper_filter >> 1`: mask of the tree minus its last level.
    lower_filter: u32,
}

impl BinomialEngine {
    /// Remaps `bucket` uniformly within its power-of-two level,
    /// keeping the choice deterministic in `hash`.
    fn relocate_inside_level(bucket: u32, hash: u64) -> u32 {
        if bucket < 2 {
            return bucket;
        }
        let level_base = highest_one_bit(bucket);
        let level_filter = level_base - 1;
        let mut rng = DeterministicRng::from_seed_pair(u64::from(level_filter), hash);
        level_base + (rng.next() & level_filter)
    }
}

impl Engine for BinomialEngine {
    fn new(_capacity: u32, working: u32) -> Self {
        assert!(working > 0, "working set must not be empty");
        let upper_filter = working.next_power_of_two() - 1;
        Self {
            size: working,
            upper_filter,
            lower_filter: upper_filter >> 1,
        }
    }

    fn get_bucket(&self, key: u64, seed: u64) -> u32 {
        if self.size < 2 {
            return 0;
        }
        let hash = u64::from(mix(key, seed));
        let bucket = Self::relocate_inside_level(hash as u32 & self.upper_filter, hash);
        if bucket < self.size {
            return bucket;
        }
        // Two fresh draws over the upper tree before giving up on the
        // last level; keeps the tail of the level balanced.
        let mut h = hash;
        for _ in 0..2 {
            let mut rng = DeterministicRng::from_seed_pair(u64::from(self.upper_filter), h);
            h = u64::from(rng.next());
            let bucket = h as u32 & self.upper_filter;
            if bucket > self.lower_filter && bucket < self.size {
                return bucket;
            }
        }
        // Lower-tree fallback keeps the pristine hash so the remap
        // agrees with the initial relocation of smaller working sets;
        // the lower tree is always fully populated.
        Self::relocate_inside_level(hash as u32 & self.lower_filter, hash)
    }

    fn add_bucket(&mut self) -> Result<u32, EngineError> {
        let b = self.size;
        self.size += 1;
        if self.size > self.upper_filter {
            self.upper_filter = (self.upper_filter << 1) | 1;
            self.lower_filter = (self.lower_filter << 1) | 1;
        }
        Ok(b)
    }

    fn remove_bucket(&mut self, _bucket: u32) -> Result<u32, EngineError> {
        if self.size == 1 {
            return Err(EngineError::LastBucket);
        }
        self.size -= 1;
        if self.size <= self.lower_filter {
            self.lower_filter >>= 1;
            self.upper_filter >>= 1;
        }
        Ok(self.size)
    }

    fn len(&self) -> u32 {
        self.size
    }
}
