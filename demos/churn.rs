use std::time::Instant;

use consistent_hashing::{AnyEngine, EngineKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CAPACITY: u32 = 8192;
const WORKING: u32 = 8000;
const REMOVALS: u32 = 800;
const N_KEYS: usize = 1_000_000;
const GEN_SEED: u64 = 42;

const KINDS: [EngineKind; 6] = [
    EngineKind::Anchor,
    EngineKind::Jump,
    EngineKind::Power,
    EngineKind::Binomial,
    EngineKind::Memento,
    EngineKind::MementoOne,
];

fn main() {
    println!("--- consistent_hashing churn demo ---");
    println!("capacity = {CAPACITY}, working = {WORKING}, removals = {REMOVALS}, keys = {N_KEYS}");

    let mut rng = StdRng::seed_from_u64(GEN_SEED);
    let keys: Vec<u64> = (0..N_KEYS).map(|_| rng.r#gen()).collect();

    for kind in KINDS {
        // 1) init
        let t0 = Instant::now();
        let mut engine = AnyEngine::new(kind, CAPACITY, WORKING);
        let init_s = t0.elapsed().as_secs_f64();

        // 2) churn: remove a random slice of the working set
        let t1 = Instant::now();
        let mut working: Vec<u32> = (0..WORKING).collect();
        for _ in 0..REMOVALS {
            let at = rng.gen_range(0..working.len());
            let target = working.swap_remove(at);
            let _ = engine.remove_bucket(target);
        }
        let churn_s = t1.elapsed().as_secs_f64();

        // 3) lookups (xor-accumulate so the loop survives the optimizer)
        let t2 = Instant::now();
        let mut acc: u32 = 0;
        for &k in &keys {
            acc ^= engine.get_bucket(k, 0x1234);
        }
        let lookup_s = t2.elapsed().as_secs_f64();

        println!(
            "{:>10?}  init: {:>8.3} ms   churn: {:>8.3} ms   lookup: {:>8.3} s ({:.1} M/s)   (acc={acc})",
            kind,
            init_s * 1e3,
            churn_s * 1e3,
            lookup_s,
            N_KEYS as f64 / lookup_s / 1e6
        );
    }
}
