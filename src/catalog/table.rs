//! Catalog implementation
//!
//! Sharded store table with a `parking_lot::RwLock` per shard.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use super::model::{normalize, Store};

/// The worker's in-memory store catalog
///
/// ## Concurrency:
/// - Each shard is an independent `RwLock`
/// - `read_store` / `write_store` take exactly one shard lock
/// - `scan` read-locks every shard in index order and holds them all, so it
///   observes a state no concurrent single-store operation is halfway through
/// - All methods use `&self`
pub struct Catalog {
    shards: Vec<RwLock<Shard>>,

    /// Insertion order across shards
    next_seq: AtomicU64,
}

#[derive(Default)]
struct Shard {
    /// Append-only, in insertion order
    records: Vec<Record>,

    /// Normalized name -> position of the first record with that name
    index: HashMap<String, usize>,
}

struct Record {
    seq: u64,
    store: Store,
}

impl Shard {
    fn position(&self, name: &str) -> Option<usize> {
        self.index.get(&normalize(name)).copied()
    }
}

impl Catalog {
    /// Create an empty catalog with `shard_count` shards (at least one)
    pub fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1)).map(|_| RwLock::new(Shard::default())).collect();
        Self {
            shards,
            next_seq: AtomicU64::new(0),
        }
    }

    /// Add a store. Names are not checked for collisions: a second store with
    /// the same name is kept, but name lookups keep resolving to the first.
    pub fn insert(&self, store: Store) {
        let key = normalize(&store.name);
        let mut shard = self.shards[self.shard_index(&key)].write();

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let position = shard.records.len();
        shard.index.entry(key).or_insert(position);
        shard.records.push(Record { seq, store });
    }

    /// Run `f` against the named store under its shard's read lock
    pub fn read_store<R>(&self, name: &str, f: impl FnOnce(&Store) -> R) -> Option<R> {
        let shard = self.shards[self.shard_index(&normalize(name))].read();
        let position = shard.position(name)?;
        Some(f(&shard.records[position].store))
    }

    /// Run `f` against the named store under its shard's write lock
    pub fn write_store<R>(&self, name: &str, f: impl FnOnce(&mut Store) -> R) -> Option<R> {
        let mut shard = self.shards[self.shard_index(&normalize(name))].write();
        let position = shard.position(name)?;
        Some(f(&mut shard.records[position].store))
    }

    /// Visit every store in insertion order against one consistent snapshot
    pub fn scan(&self, mut visit: impl FnMut(&Store)) {
        let guards: Vec<_> = self.shards.iter().map(|shard| shard.read()).collect();

        let mut records: Vec<&Record> = guards.iter().flat_map(|shard| shard.records.iter()).collect();
        records.sort_unstable_by_key(|record| record.seq);

        for record in records {
            visit(&record.store);
        }
    }

    /// Number of store records, duplicates included
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Shard holding the given store name
    pub fn shard_of(&self, name: &str) -> usize {
        self.shard_index(&normalize(name))
    }

    fn shard_index(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.shards.len() as u64) as usize
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(1)
    }
}
