//! Jump consistent hashing: no per-bucket state at all, logarithmic
//! expected lookups, tail-only membership changes.

use crate::engine::{Engine, EngineError};
use crate::mix::mix64;

/// The jump loop from Lamping & Veach, shared with the jump-backed
/// Memento engine.
pub(crate) fn jump_consistent(mut hash: u64, buckets: u32) -> u32 {
    let n = i64::from(buckets);
    let mut b: i64 = 1;
    let mut j: i64 = 0;
    while j < n {
        b = j;
        hash = hash.wrapping_mul(2_862_933_555_777_941_757).wrapping_add(1);
        j = ((b + 1) as f64 * (f64::from(1u32 << 31) / ((hash >> 33) + 1) as f64)) as i64;
    }
    b as u32
}

pub struct JumpEngine {
    buckets: u32,
}

impl Engine for JumpEngine {
    fn new(_capacity: u32, working: u32) -> Self {
        assert!(working > 0, "working set must not be empty");
        Self { buckets: working }
    }

    fn get_bucket(&self, key: u64, seed: u64) -> u32 {
        jump_consistent(mix64(key, seed), self.buckets)
    }

    fn add_bucket(&mut self) -> Result<u32, EngineError> {
        let b = self.buckets;
        self.buckets += 1;
        Ok(b)
    }

    fn remove_bucket(&mut self, _bucket: u32) -> Result<u32, EngineError> {
        if self.buckets == 1 {
            return Err(EngineError::LastBucket);
        }
        self.buckets -= 1;
        Ok(self.buckets)
    }

    fn len(&self) -> u32 {
        self.buckets
    }
}
