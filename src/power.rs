//! Power-of-two-choices consistent hashing: constant-time expected
//! lookups via a two-level dispatch between the power-of-two range
//! above the working set and its lower half.

use crate::engine::{Engine, EngineError};
use crate::mix::mix;
use crate::rng::DeterministicRng;

/// Algorithm f: uniform over `[2^j, 2^(j+1))` where `j` is the index
/// of the highest set bit of `k & mask`.
fn f(k: u32, mask: u32) -> u32 {
    let k_bits = k & mask;
    if k_bits == 0 {
        return 0;
    }
    let j = 31 - k_bits.leading_zeros();
    let h = 1u32 << j;
    let mut rng = DeterministicRng::from_seed_pair(u64::from(k), u64::from(j));
    h + (rng.next() & (h - 1))
}

/// Algorithm g: monotone walk from `s` towards `n`, driven by a
/// uniform-(0,1] stream seeded once from the key.
fn g(k: u32, n: u32, s: u32) -> u32 {
    let mut x = s;
    let mut rng = DeterministicRng::from_seed(u64::from(k));
    loop {
        let u = rng.next_unit();
        // u == 0 overflows the division to infinity; the saturating
        // cast then lands above n and terminates the walk.
        let r = (((f64::from(x) + 1.0) / u).ceil() as u32).wrapping_sub(1);
        if r < n {
            x = r;
        } else {
            return x;
        }
    }
}

/// Full dispatch, shared with the power-backed Memento engine.
/// `mm1 = m - 1` and `mhm1 = m/2 - 1` for `m` the smallest power of
/// two at or above `n`.
pub(crate) fn power_consistent(k: u32, n: u32, mm1: u32, mhm1: u32) -> u32 {
    let r1 = f(k, mm1);
    if r1 < n {
        return r1;
    }
    let r2 = g(k, n, mhm1);
    if r2 > mhm1 {
        return r2;
    }
    f(k, mhm1)
}

pub struct PowerEngine {
    n: u32,
    /// `m - 1`, `m` the smallest power of two at or above `n`.
    mm1: u32,
    /// `m/2 - 1`; wraps at `n = 1`, where it is unreachable.
    mhm1: u32,
}

impl PowerEngine {
    fn update_params(&mut self) {
        let m = self.n.next_power_of_two();
        self.mm1 = m - 1;
        self.mhm1 = (m >> 1).wrapping_sub(1);
    }
}

impl Engine for PowerEngine {
    fn new(_capacity: u32, working: u32) -> Self {
        assert!(working > 0, "working set must not be empty");
        let mut engine = Self { n: working, mm1: 0, mhm1: 0 };
        engine.update_params();
        engine
    }

    fn get_bucket(&self, key: u64, seed: u64) -> u32 {
        power_consistent(mix(key, seed), self.n, self.mm1, self.mhm1)
    }

    fn add_bucket(&mut self) -> Result<u32, EngineError> {
        let b = self.n;
        self.n += 1;
        self.update_params();
        Ok(b)
    }

    fn remove_bucket(&mut self, _bucket: u32) -> Result<u32, EngineError> {
        if self.n == 1 {
            return Err(EngineError::LastBucket);
        }
        self.n -= 1;
        self.update_params();
        Ok(self.n)
    }

    fn len(&self) -> u32 {
        self.n
    }
}
