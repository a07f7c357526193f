//! consistent_hashing — engines that map keys to a changing set of
//! buckets while moving as few keys as possible.
//!
//! - **Anchor**: fixed capacity, arbitrary removals, branch-light lookups.
//! - **Jump**: zero state beyond a counter; tail-only changes.
//! - **Power**: constant-time two-level dispatch; tail-only.
//! - **Binomial**: binary tree of levels; tail-only.
//! - **Memento** / **Memento-one**: Jump or Power plus a replacement
//!   table, enabling arbitrary removals.
//!
//! Every engine implements [`Engine`]; [`AnyEngine`] bundles them for
//! drivers that pick an algorithm at runtime. Lookups are `&self` and
//! deterministic: same state, same `(key, seed)`, same bucket.

mod anchor;
mod binomial;
mod dx;
mod engine;
mod jump;
mod maglev;
mod mashtable;
mod memento;
mod memento_engine;
mod mix;
mod power;
mod ring;
mod rng;

pub use anchor::AnchorEngine;
pub use binomial::BinomialEngine;
pub use dx::DxEngine;
pub use engine::{AnyEngine, Engine, EngineError, EngineKind};
pub use jump::JumpEngine;
pub use maglev::MaglevEngine;
pub use mashtable::MashTable;
pub use memento::{Entry, Memento, ReplacementMap};
pub use memento_engine::{MementoEngine, MementoOneEngine};
pub use mix::{mix, mix64, splat32};
pub use power::PowerEngine;
pub use ring::RingEngine;
pub use rng::DeterministicRng;
