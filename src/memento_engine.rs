//! MementoHash: wraps a tail-only front hash (Jump, or Power for the
//! "one"-variant) with a replacement table so arbitrary buckets can be
//! removed.
//!
//! A key first hashes into `[0, b_array_size)`. Landing on a removed
//! bucket, the lookup rehashes into the working-set size recorded at
//! that removal, following nested removals until it reaches a live
//! bucket. As long as no hole exists the engines behave exactly like
//! their front hash.

use crate::engine::{Engine, EngineError};
use crate::jump::jump_consistent;
use crate::mashtable::MashTable;
use crate::memento::{Entry, Memento, ReplacementMap};
use crate::mix::{mix, mix64};
use crate::power::power_consistent;

/// Replacement walk shared by both variants: `b` is the front-hash
/// result, possibly a hole.
fn chase_replacements<M: ReplacementMap>(memento: &Memento<M>, key: u64, mut b: u32) -> u32 {
    let mut replacer = memento.replacer(b);
    while let Some(rep) = replacer {
        // Rehash into the working set as it was when this hole formed.
        let h = mix(key, u64::from(b));
        b = h % rep;
        // A hole whose replacer is at or above the bound means we are
        // re-examining a bucket removed later; follow it down.
        loop {
            match memento.replacer(b) {
                Some(r) if r >= rep => b = r,
                next => {
                    replacer = next;
                    break;
                }
            }
        }
    }
    b
}

pub struct MementoEngine<M: ReplacementMap = MashTable<Entry>> {
    memento: Memento<M>,
    b_array_size: u32,
    last_removed: u32,
}

impl<M: ReplacementMap> MementoEngine<M> {
    /// Upper bound of bucket ids the front hash draws from.
    pub fn b_array_size(&self) -> u32 {
        self.b_array_size
    }

    fn remove_common(&mut self, bucket: u32) -> Result<u32, EngineError> {
        if bucket >= self.b_array_size || self.memento.replacer(bucket).is_some() {
            return Err(EngineError::BucketNotWorking(bucket));
        }
        if self.b_array_size - self.memento.len() as u32 == 1 {
            return Err(EngineError::LastBucket);
        }
        if self.last_removed == self.b_array_size && bucket == self.b_array_size - 1 {
            // Pure tail removal: same regime as the front hash alone.
            self.last_removed = bucket;
            self.b_array_size = bucket;
        } else {
            let replacer = self.b_array_size - self.memento.len() as u32 - 1;
            self.last_removed = self.memento.remember(bucket, replacer, self.last_removed);
        }
        Ok(bucket)
    }

    fn add_common(&mut self) -> u32 {
        let bucket = self.last_removed;
        self.last_removed = self.memento.restore(bucket);
        self.b_array_size = self.b_array_size.max(bucket + 1);
        bucket
    }
}

impl<M: ReplacementMap> Engine for MementoEngine<M> {
    fn new(_capacity: u32, working: u32) -> Self {
        assert!(working > 0, "working set must not be empty");
        Self {
            memento: Memento::new(),
            b_array_size: working,
            last_removed: working,
        }
    }

    fn get_bucket(&self, key: u64, seed: u64) -> u32 {
        let b = jump_consistent(mix64(key, seed), self.b_array_size);
        chase_replacements(&self.memento, key, b)
    }

    fn add_bucket(&mut self) -> Result<u32, EngineError> {
        Ok(self.add_common())
    }

    fn remove_bucket(&mut self, bucket: u32) -> Result<u32, EngineError> {
        self.remove_common(bucket)
    }

    fn len(&self) -> u32 {
        self.b_array_size - self.memento.len() as u32
    }
}

/// Power-backed variant ("Memento-one"): constant-time front hash at
/// the cost of the cached power-of-two parameters.
pub struct MementoOneEngine<M: ReplacementMap = MashTable<Entry>> {
    inner: MementoEngine<M>,
    /// `m - 1`, `m` the smallest power of two at or above the b-array.
    mm1: u32,
    /// `m/2 - 1`; wraps at size 1, where it is unreachable.
    mhm1: u32,
}

impl<M: ReplacementMap> MementoOneEngine<M> {
    fn update_params(&mut self) {
        let m = self.inner.b_array_size.next_power_of_two();
        self.mm1 = m - 1;
        self.mhm1 = (m >> 1).wrapping_sub(1);
    }

    pub fn b_array_size(&self) -> u32 {
        self.inner.b_array_size
    }
}

impl<M: ReplacementMap> Engine for MementoOneEngine<M> {
    fn new(capacity: u32, working: u32) -> Self {
        let mut engine = Self {
            inner: MementoEngine::new(capacity, working),
            mm1: 0,
            mhm1: 0,
        };
        engine.update_params();
        engine
    }

    fn get_bucket(&self, key: u64, seed: u64) -> u32 {
        let b = power_consistent(mix(key, seed), self.inner.b_array_size, self.mm1, self.mhm1);
        chase_replacements(&self.inner.memento, key, b)
    }

    fn add_bucket(&mut self) -> Result<u32, EngineError> {
        let b = self.inner.add_common();
        self.update_params();
        Ok(b)
    }

    fn remove_bucket(&mut self, bucket: u32) -> Result<u32, EngineError> {
        let b = self.inner.remove_common(bucket)?;
        self.update_params();
        Ok(b)
    }

    fn len(&self) -> u32 {
        self.inner.len()
    }
}
