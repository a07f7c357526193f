//! Classic hash-ring wrapper: buckets own points on a 32-bit circle,
//! keys walk clockwise to the next point. Kept behind the uniform
//! trait only; the interesting engines live elsewhere.

use std::collections::BTreeMap;

use crate::engine::{Engine, EngineError};
use crate::mix::{mix, splat32};

/// Seed for placing bucket points, shared by build and removal.
const POINT_SEED: u64 = 1;

pub struct RingEngine {
    /// point position on the circle -> bucket id
    points: BTreeMap<u32, u32>,
    /// removed buckets (and initially reserved ids), most recent on top
    reserve: Vec<u32>,
}

impl RingEngine {
    #[inline]
    fn point_of(bucket: u32) -> u32 {
        mix(u64::from(bucket), POINT_SEED)
    }

    fn insert(&mut self, bucket: u32) {
        self.points.insert(Self::point_of(bucket), bucket);
    }
}

impl Engine for RingEngine {
    fn new(capacity: u32, working: u32) -> Self {
        assert!(working > 0, "working set must not be empty");
        let mut engine = Self {
            points: BTreeMap::new(),
            reserve: Vec::new(),
        };
        for b in 0..working {
            engine.insert(b);
        }
        for b in (working..capacity).rev() {
            engine.reserve.push(b);
        }
        engine
    }

    fn get_bucket(&self, key: u64, seed: u64) -> u32 {
        let hv = mix(key, u64::from(splat32(seed as u32)));
        let hit = self
            .points
            .range(hv..)
            .next()
            .or_else(|| self.points.iter().next());
        match hit {
            Some((_, &bucket)) => bucket,
            None => unreachable!("ring is never empty"),
        }
    }

    fn add_bucket(&mut self) -> Result<u32, EngineError> {
        let bucket = self.reserve.pop().ok_or(EngineError::AtCapacity)?;
        self.insert(bucket);
        Ok(bucket)
    }

    fn remove_bucket(&mut self, bucket: u32) -> Result<u32, EngineError> {
        if self.points.len() == 1 {
            return Err(EngineError::LastBucket);
        }
        if self.points.remove(&Self::point_of(bucket)).is_none() {
            return Err(EngineError::BucketNotWorking(bucket));
        }
        self.reserve.push(bucket);
        Ok(bucket)
    }

    fn len(&self) -> u32 {
        self.points.len() as u32
    }
}
