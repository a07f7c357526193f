//! DxHash wrapper: a bit vector of slots probed by iterated mixing.
//! Keys re-mix until they hit a live slot; additions reuse the same
//! probe to pick a pseudo-random inactive slot.

use crate::engine::{Engine, EngineError};
use crate::mix::{mix, splat32};

pub struct DxEngine {
    nodes: Vec<bool>,
    size: u32,
    working: u32,
}

impl DxEngine {
    /// Probe sequence over all slots; returns the first slot in the
    /// wanted state, scanning as a last resort when the attempt cap
    /// (4x the slot count) runs out.
    fn probe(&self, key: u64, seed: u64, want_live: bool) -> u32 {
        let key2 = u64::from(splat32(key as u32));
        let mut bs = mix(key, seed.wrapping_add(key2));
        let mut index = bs % self.size;
        let mut attempts = 1u64;
        while self.nodes[index as usize] != want_live {
            bs = mix(u64::from(bs), key2);
            index = bs % self.size;
            attempts += 1;
            if attempts >= 4 * u64::from(self.size) {
                // Deterministic fallback keeps the lookup contract.
                return match self.nodes.iter().position(|&live| live == want_live) {
                    Some(i) => i as u32,
                    None => unreachable!("probe target state always exists"),
                };
            }
        }
        index
    }
}

impl Engine for DxEngine {
    fn new(capacity: u32, working: u32) -> Self {
        assert!(working > 0, "working set must not be empty");
        let size = if capacity >= working {
            capacity
        } else {
            working.next_power_of_two()
        };
        let mut nodes = vec![false; size as usize];
        for slot in nodes.iter_mut().take(working as usize) {
            *slot = true;
        }
        Self { nodes, size, working }
    }

    fn get_bucket(&self, key: u64, seed: u64) -> u32 {
        self.probe(key, seed, true)
    }

    fn add_bucket(&mut self) -> Result<u32, EngineError> {
        if self.working == self.size {
            return Err(EngineError::AtCapacity);
        }
        // Same constant the reference implementation probes with.
        let index = self.probe(1228, 0, false);
        self.nodes[index as usize] = true;
        self.working += 1;
        Ok(index)
    }

    fn remove_bucket(&mut self, bucket: u32) -> Result<u32, EngineError> {
        if bucket >= self.size || !self.nodes[bucket as usize] {
            return Err(EngineError::BucketNotWorking(bucket));
        }
        if self.working == 1 {
            return Err(EngineError::LastBucket);
        }
        self.nodes[bucket as usize] = false;
        self.working -= 1;
        Ok(bucket)
    }

    fn len(&self) -> u32 {
        self.working
    }
}
