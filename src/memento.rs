//! Replacement table recording bucket removals as a reverse-linked
//! history: each removed bucket remembers who replaced it and which
//! bucket was removed before it.

use crate::mashtable::MashTable;

/// One remembered removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    /// Bucket that took over the removed bucket's role. Also equals
    /// the working-set size right after the removal.
    pub replacer: u32,
    /// Bucket removed immediately before this one.
    pub prev_removed: u32,
}

/// Backend storage for the replacement table. Any integer-keyed map
/// with O(1) expected exact-match lookup qualifies.
pub trait ReplacementMap: Default {
    fn insert(&mut self, bucket: u32, entry: Entry);
    fn get(&self, bucket: u32) -> Option<&Entry>;
    fn remove(&mut self, bucket: u32) -> Option<Entry>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReplacementMap for MashTable<Entry> {
    #[inline]
    fn insert(&mut self, bucket: u32, entry: Entry) {
        self.emplace(bucket, entry);
    }

    #[inline]
    fn get(&self, bucket: u32) -> Option<&Entry> {
        self.find(bucket)
    }

    #[inline]
    fn remove(&mut self, bucket: u32) -> Option<Entry> {
        MashTable::remove(self, bucket)
    }

    #[inline]
    fn len(&self) -> usize {
        MashTable::len(self)
    }
}

impl ReplacementMap for hashbrown::HashMap<u32, Entry, ahash::RandomState> {
    #[inline]
    fn insert(&mut self, bucket: u32, entry: Entry) {
        hashbrown::HashMap::insert(self, bucket, entry);
    }

    #[inline]
    fn get(&self, bucket: u32) -> Option<&Entry> {
        hashbrown::HashMap::get(self, &bucket)
    }

    #[inline]
    fn remove(&mut self, bucket: u32) -> Option<Entry> {
        hashbrown::HashMap::remove(self, &bucket)
    }

    #[inline]
    fn len(&self) -> usize {
        hashbrown::HashMap::len(self)
    }
}

/// The removal history itself.
#[derive(Default)]
pub struct Memento<M: ReplacementMap> {
    table: M,
}

impl<M: ReplacementMap> Memento<M> {
    pub fn new() -> Self {
        Self { table: M::default() }
    }

    /// Number of remembered removals.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Records that `bucket` was removed and replaced by `replacer`,
    /// chaining it to the previously removed bucket. Returns the new
    /// last-removed bucket (i.e. `bucket`).
    pub fn remember(&mut self, bucket: u32, replacer: u32, prev_removed: u32) -> u32 {
        self.table.insert(bucket, Entry { replacer, prev_removed });
        bucket
    }

    /// Forgets `bucket`, returning the new last-removed value: the
    /// entry's predecessor, or `bucket + 1` when nothing is remembered
    /// (the caller is back in the pure-tail regime).
    pub fn restore(&mut self, bucket: u32) -> u32 {
        if self.table.is_empty() {
            return bucket + 1;
        }
        match self.table.remove(bucket) {
            Some(entry) => entry.prev_removed,
            None => bucket + 1,
        }
    }

    /// The replacer of `bucket` if it was removed. The value doubles
    /// as the working-set size at the moment of that removal.
    #[inline]
    pub fn replacer(&self, bucket: u32) -> Option<u32> {
        self.table.get(bucket).map(|e| e.replacer)
    }
}
