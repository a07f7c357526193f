//! AnchorHash: a fixed-capacity engine that supports removing
//! arbitrary buckets, not just the tail.
//!
//! Four arrays indexed by bucket id carry the whole state. `a[b]` is
//! zero while `b` works and otherwise records the working-set size at
//! the moment `b` was removed; `w` holds the working buckets in its
//! first `n` slots; `l[b]` remembers where `b` sits in `w`; `k` is the
//! diagonal used to translate a hash observed against a stale
//! working-set snapshot into a bucket that is still live. Removed
//! buckets stack up in `reserve` and re-enter LIFO.

use crate::engine::{Engine, EngineError};
use crate::mix::mix;

pub struct AnchorEngine {
    a: Vec<u32>,
    w: Vec<u32>,
    l: Vec<u32>,
    k: Vec<u32>,
    /// Capacity: size of the anchor set.
    m: u32,
    /// Size of the working set.
    n: u32,
    /// Removed buckets, most recent on top.
    reserve: Vec<u32>,
}

impl AnchorEngine {
    /// Translates hash observation `j` made against removed bucket
    /// `i`'s snapshot into a bucket that observed `i` while it worked.
    fn translate(&self, i: u32, j: u32) -> u32 {
        if i == j {
            return self.k[i as usize];
        }
        let mut b = j;
        while self.a[i as usize] <= self.a[b as usize] {
            b = self.k[b as usize];
        }
        b
    }
}

impl Engine for AnchorEngine {
    fn new(capacity: u32, working: u32) -> Self {
        assert!(
            0 < working && working <= capacity,
            "working set must satisfy 0 < working <= capacity"
        );
        let cap = capacity as usize;
        let mut engine = Self {
            a: vec![0; cap],
            w: (0..capacity).collect(),
            l: (0..capacity).collect(),
            k: (0..capacity).collect(),
            m: capacity,
            n: working,
            reserve: Vec::with_capacity(cap - working as usize),
        };
        // Initially reserved buckets look like ordered removals, so
        // the reserve pops the lowest id first.
        for i in (working..capacity).rev() {
            engine.a[i as usize] = i;
            engine.reserve.push(i);
        }
        engine
    }

    fn get_bucket(&self, key: u64, seed: u64) -> u32 {
        let mut hash = mix(key, seed);
        let mut b = hash % self.m;
        while self.a[b as usize] != 0 {
            // Reseed away from the previous draw to avoid patterns.
            hash = mix(
                key.wrapping_sub(u64::from(hash)),
                seed.wrapping_add(u64::from(hash)),
            );
            let h = hash % self.a[b as usize];
            if self.a[h as usize] == 0 || self.a[h as usize] < self.a[b as usize] {
                // h was working when b got removed: descend.
                b = h;
            } else {
                b = self.translate(b, h);
            }
        }
        b
    }

    fn add_bucket(&mut self) -> Result<u32, EngineError> {
        let b = self.reserve.pop().ok_or(EngineError::AtCapacity)?;
        let (b_us, n_us) = (b as usize, self.n as usize);
        self.l[self.w[n_us] as usize] = self.n;
        self.w[self.l[b_us] as usize] = b;
        self.n += 1;
        self.a[b_us] = 0;
        self.k[b_us] = b;
        Ok(b)
    }

    fn remove_bucket(&mut self, bucket: u32) -> Result<u32, EngineError> {
        if bucket >= self.m || self.a[bucket as usize] != 0 {
            return Err(EngineError::BucketNotWorking(bucket));
        }
        if self.n == 1 {
            return Err(EngineError::LastBucket);
        }
        self.reserve.push(bucket);
        self.n -= 1;
        let (b_us, n_us) = (bucket as usize, self.n as usize);
        self.w[self.l[b_us] as usize] = self.w[n_us];
        self.l[self.w[n_us] as usize] = self.l[b_us];
        self.k[b_us] = self.w[n_us];
        self.a[b_us] = self.n;
        Ok(bucket)
    }

    fn len(&self) -> u32 {
        self.n
    }
}
