//! Uniform surface shared by every engine.

use thiserror::Error;

use crate::anchor::AnchorEngine;
use crate::binomial::BinomialEngine;
use crate::dx::DxEngine;
use crate::jump::JumpEngine;
use crate::maglev::MaglevEngine;
use crate::memento_engine::{MementoEngine, MementoOneEngine};
use crate::power::PowerEngine;
use crate::ring::RingEngine;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("bucket {0} is not in the working set")]
    BucketNotWorking(u32),
    #[error("no removed buckets to restore; engine is at capacity")]
    AtCapacity,
    #[error("cannot remove the last working bucket")]
    LastBucket,
}

/// A consistent-hashing engine over integer buckets.
///
/// Lookups are pure functions of the engine state and the
/// `(key, seed)` pair; updates mutate the working set one bucket at a
/// time and report the affected bucket id.
pub trait Engine {
    /// Builds an engine with `capacity` total buckets, of which the
    /// first `working` are initially live. Tail-only engines ignore
    /// `capacity`. Requires `0 < working <= capacity`.
    fn new(capacity: u32, working: u32) -> Self
    where
        Self: Sized;

    /// Maps `(key, seed)` to a currently-working bucket.
    fn get_bucket(&self, key: u64, seed: u64) -> u32;

    /// Brings one bucket back into service, returning its id. For
    /// engines with a reserve this restores the most recently removed
    /// bucket; tail-only engines extend the tail.
    fn add_bucket(&mut self) -> Result<u32, EngineError>;

    /// Takes `bucket` out of service, returning the bucket actually
    /// removed. Tail-only engines ignore the argument and pop the
    /// highest id.
    fn remove_bucket(&mut self, bucket: u32) -> Result<u32, EngineError>;

    /// Current working-set size.
    fn len(&self) -> u32;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Discriminant for [`AnyEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Anchor,
    Jump,
    Power,
    Binomial,
    Memento,
    MementoOne,
    Ring,
    Dx,
    Maglev,
}

/// Sum type over the closed set of engines, for drivers that treat
/// them uniformly without trait objects.
pub enum AnyEngine {
    Anchor(AnchorEngine),
    Jump(JumpEngine),
    Power(PowerEngine),
    Binomial(BinomialEngine),
    Memento(MementoEngine),
    MementoOne(MementoOneEngine),
    Ring(RingEngine),
    Dx(DxEngine),
    Maglev(MaglevEngine),
}

macro_rules! dispatch {
    ($self:expr, $e:ident => $body:expr) => {
        match $self {
            AnyEngine::Anchor($e) => $body,
            AnyEngine::Jump($e) => $body,
            AnyEngine::Power($e) => $body,
            AnyEngine::Binomial($e) => $body,
            AnyEngine::Memento($e) => $body,
            AnyEngine::MementoOne($e) => $body,
            AnyEngine::Ring($e) => $body,
            AnyEngine::Dx($e) => $body,
            AnyEngine::Maglev($e) => $body,
        }
    };
}

impl AnyEngine {
    pub fn new(kind: EngineKind, capacity: u32, working: u32) -> Self {
        match kind {
            EngineKind::Anchor => Self::Anchor(AnchorEngine::new(capacity, working)),
            EngineKind::Jump => Self::Jump(JumpEngine::new(capacity, working)),
            EngineKind::Power => Self::Power(PowerEngine::new(capacity, working)),
            EngineKind::Binomial => Self::Binomial(BinomialEngine::new(capacity, working)),
            EngineKind::Memento => Self::Memento(MementoEngine::new(capacity, working)),
            EngineKind::MementoOne => Self::MementoOne(MementoOneEngine::new(capacity, working)),
            EngineKind::Ring => Self::Ring(RingEngine::new(capacity, working)),
            EngineKind::Dx => Self::Dx(DxEngine::new(capacity, working)),
            EngineKind::Maglev => Self::Maglev(MaglevEngine::new(capacity, working)),
        }
    }

    pub fn kind(&self) -> EngineKind {
        match self {
            Self::Anchor(_) => EngineKind::Anchor,
            Self::Jump(_) => EngineKind::Jump,
            Self::Power(_) => EngineKind::Power,
            Self::Binomial(_) => EngineKind::Binomial,
            Self::Memento(_) => EngineKind::Memento,
            Self::MementoOne(_) => EngineKind::MementoOne,
            Self::Ring(_) => EngineKind::Ring,
            Self::Dx(_) => EngineKind::Dx,
            Self::Maglev(_) => EngineKind::Maglev,
        }
    }

    pub fn get_bucket(&self, key: u64, seed: u64) -> u32 {
        dispatch!(self, e => e.get_bucket(key, seed))
    }

    pub fn add_bucket(&mut self) -> Result<u32, EngineError> {
        dispatch!(self, e => e.add_bucket())
    }

    pub fn remove_bucket(&mut self, bucket: u32) -> Result<u32, EngineError> {
        dispatch!(self, e => e.remove_bucket(bucket))
    }

    pub fn len(&self) -> u32 {
        dispatch!(self, e => e.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
