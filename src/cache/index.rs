//! Equality-Keyed Index Module
//!
//! Sharded key/value map. Keys are located by `Eq + Hash`, never by identity,
//! and every operation on one key runs under that key's shard lock.

use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use parking_lot::RwLock;

/// Default number of shards.
pub const DEFAULT_SHARDS: usize = 16;

// == Closed Marker ==
/// Returned by index operations once [`ShardedIndex::close`] has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closed;

// == Shard ==
#[derive(Debug)]
struct Shard<K, V> {
    entries: HashMap<K, V>,
    closed: bool,
}

impl<K, V> Default for Shard<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            closed: false,
        }
    }
}

// == Sharded Index ==
/// Key/value map split across independently locked shards.
///
/// Operations on keys in different shards never contend. Values handed to
/// and from the index are expected to be boundary copies; the index itself
/// never copies.
#[derive(Debug)]
pub struct ShardedIndex<K, V> {
    shards: Vec<RwLock<Shard<K, V>>>,
    hasher: RandomState,
}

impl<K, V> ShardedIndex<K, V>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates an index with `shards` shards (at least one).
    pub fn new(shards: usize) -> Self {
        let shards = (0..shards.max(1))
            .map(|_| RwLock::new(Shard::default()))
            .collect();
        Self {
            shards,
            hasher: RandomState::new(),
        }
    }

    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_for(&self, key: &K) -> &RwLock<Shard<K, V>> {
        let index = (self.hasher.hash_one(key) as usize) % self.shards.len();
        &self.shards[index]
    }

    // == Lookup ==
    /// Applies `read` to the value stored under a key equal to `key`.
    ///
    /// `read` runs while the shard is read-locked, so the store can copy the
    /// value out before any writer replaces it.
    pub fn lookup_with<R>(&self, key: &K, read: impl FnOnce(&V) -> R) -> Result<Option<R>, Closed> {
        let shard = self.shard_for(key).read();
        if shard.closed {
            return Err(Closed);
        }
        Ok(shard.entries.get(key).map(read))
    }

    /// Returns true if a key equal to `key` is present.
    pub fn contains(&self, key: &K) -> Result<bool, Closed> {
        let shard = self.shard_for(key).read();
        if shard.closed {
            return Err(Closed);
        }
        Ok(shard.entries.contains_key(key))
    }

    // == Upsert ==
    /// Stores `value` under `key` and returns the displaced value.
    ///
    /// When an equal key is already present its stored key is kept and only
    /// the value changes; `copy_key` is called only for a fresh entry.
    pub fn upsert(
        &self,
        key: &K,
        copy_key: impl FnOnce(&K) -> K,
        value: V,
    ) -> Result<Option<V>, Closed> {
        let mut shard = self.shard_for(key).write();
        if shard.closed {
            return Err(Closed);
        }
        if let Some(slot) = shard.entries.get_mut(key) {
            return Ok(Some(std::mem::replace(slot, value)));
        }
        shard.entries.insert(copy_key(key), value);
        Ok(None)
    }

    /// Inserts an entry only if no equal key is present.
    ///
    /// Neither `copy_key` nor `make_value` runs when the key already exists.
    pub fn insert_if_absent(
        &self,
        key: &K,
        copy_key: impl FnOnce(&K) -> K,
        make_value: impl FnOnce() -> V,
    ) -> Result<bool, Closed> {
        let mut shard = self.shard_for(key).write();
        if shard.closed {
            return Err(Closed);
        }
        if shard.entries.contains_key(key) {
            return Ok(false);
        }
        shard.entries.insert(copy_key(key), make_value());
        Ok(true)
    }

    // == Update In Place ==
    /// Applies `update` to the value under `key` while the shard is write-locked.
    ///
    /// Returns None if no equal key is present.
    pub fn update_with<R>(
        &self,
        key: &K,
        update: impl FnOnce(&mut V) -> R,
    ) -> Result<Option<R>, Closed> {
        let mut shard = self.shard_for(key).write();
        if shard.closed {
            return Err(Closed);
        }
        Ok(shard.entries.get_mut(key).map(update))
    }

    // == Remove ==
    /// Removes the entry for a key equal to `key`, returning its value.
    pub fn remove(&self, key: &K) -> Result<Option<V>, Closed> {
        let mut shard = self.shard_for(key).write();
        if shard.closed {
            return Err(Closed);
        }
        Ok(shard.entries.remove(key))
    }

    /// Removes the entry only if `predicate` accepts its current value.
    pub fn remove_if(&self, key: &K, predicate: impl FnOnce(&V) -> bool) -> Result<bool, Closed> {
        let mut shard = self.shard_for(key).write();
        if shard.closed {
            return Err(Closed);
        }
        match shard.entries.get(key) {
            Some(current) if predicate(current) => {
                shard.entries.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    // == Clear ==
    /// Removes every entry, returning how many were dropped.
    ///
    /// Shards are cleared one at a time; the clear is not atomic across shards.
    pub fn clear(&self) -> Result<usize, Closed> {
        let mut removed = 0;
        for lock in &self.shards {
            let mut shard = lock.write();
            if shard.closed {
                return Err(Closed);
            }
            removed += shard.entries.len();
            shard.entries.clear();
        }
        Ok(removed)
    }

    // == Close ==
    /// Releases every entry and rejects all later operations.
    ///
    /// Returns the number of entries released. Safe to call more than once.
    pub fn close(&self) -> usize {
        let mut released = 0;
        for lock in &self.shards {
            let mut shard = lock.write();
            shard.closed = true;
            released += shard.entries.len();
            shard.entries = HashMap::new();
        }
        released
    }

    // == Length ==
    /// Returns the number of entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|lock| lock.read().entries.len()).sum()
    }

    /// Returns true if no shard holds an entry.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|lock| lock.read().entries.is_empty())
    }
}
