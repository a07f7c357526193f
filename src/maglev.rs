//! Maglev wrapper: each bucket fills a prime-sized lookup table along
//! its own permutation; lookups are a single table index. The table is
//! rebuilt on every membership change, so updates are expensive and
//! lookups are as cheap as they get.

use crate::engine::{Engine, EngineError};
use crate::mix::mix;

/// Prime lookup-table length, comfortably above 100x typical bucket
/// counts so per-bucket shares stay within a percent of even.
const TABLE_LEN: u32 = 65_537;

const OFFSET_SEED: u64 = 0x51ED;
const SKIP_SEED: u64 = 0x8A91;

pub struct MaglevEngine {
    lookup: Vec<u32>,
    alive: Vec<bool>,
    reserve: Vec<u32>,
    working: u32,
}

impl MaglevEngine {
    fn rebuild(&mut self) {
        let nodes: Vec<u32> = (0..self.alive.len() as u32)
            .filter(|&b| self.alive[b as usize])
            .collect();
        let offsets: Vec<u64> = nodes
            .iter()
            .map(|&b| u64::from(mix(u64::from(b), OFFSET_SEED) % TABLE_LEN))
            .collect();
        let skips: Vec<u64> = nodes
            .iter()
            .map(|&b| u64::from(mix(u64::from(b), SKIP_SEED) % (TABLE_LEN - 1) + 1))
            .collect();
        let mut turn = vec![0u64; nodes.len()];
        let mut lookup = vec![u32::MAX; TABLE_LEN as usize];
        let mut filled = 0u32;
        'fill: loop {
            for (i, &node) in nodes.iter().enumerate() {
                let slot = loop {
                    let c = ((offsets[i] + turn[i] * skips[i]) % u64::from(TABLE_LEN)) as usize;
                    turn[i] += 1;
                    if lookup[c] == u32::MAX {
                        break c;
                    }
                };
                lookup[slot] = node;
                filled += 1;
                if filled == TABLE_LEN {
                    break 'fill;
                }
            }
        }
        self.lookup = lookup;
    }
}

impl Engine for MaglevEngine {
    fn new(capacity: u32, working: u32) -> Self {
        assert!(working > 0, "working set must not be empty");
        let universe = capacity.max(working);
        let mut engine = Self {
            lookup: Vec::new(),
            alive: (0..universe).map(|b| b < working).collect(),
            reserve: (working..universe).rev().collect(),
            working,
        };
        engine.rebuild();
        engine
    }

    fn get_bucket(&self, key: u64, seed: u64) -> u32 {
        self.lookup[(mix(key, seed) % TABLE_LEN) as usize]
    }

    fn add_bucket(&mut self) -> Result<u32, EngineError> {
        let bucket = self.reserve.pop().ok_or(EngineError::AtCapacity)?;
        self.alive[bucket as usize] = true;
        self.working += 1;
        self.rebuild();
        Ok(bucket)
    }

    fn remove_bucket(&mut self, bucket: u32) -> Result<u32, EngineError> {
        if bucket as usize >= self.alive.len() || !self.alive[bucket as usize] {
            return Err(EngineError::BucketNotWorking(bucket));
        }
        if self.working == 1 {
            return Err(EngineError::LastBucket);
        }
        self.alive[bucket as usize] = false;
        self.working -= 1;
        self.reserve.push(bucket);
        self.rebuild();
        Ok(bucket)
    }

    fn len(&self) -> u32 {
        self.working
    }
}
