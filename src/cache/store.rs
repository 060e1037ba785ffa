//! Value Store Module
//!
//! Main store engine: copies keys and values at every boundary crossing and
//! runs each compound operation as one critical section on the key's shard.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::cache::index::{Closed, ShardedIndex, DEFAULT_SHARDS};
use crate::cache::{CopierRegistry, CopyFn, StatsSnapshot, StoreStats};
use crate::error::{Result, StoreError};

// == Store Options ==
/// Construction parameters for a [`ValueStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Number of independently locked index shards
    pub shards: usize,
    /// Whether hit/miss/put/removal counters are recorded
    pub statistics: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            shards: DEFAULT_SHARDS,
            statistics: true,
        }
    }
}

// == Value Store ==
/// In-memory key/value store with store-by-value semantics.
///
/// Keys and values are copied on the way in and values are copied on the way
/// out, so nothing a caller holds aliases stored state. Keys are matched by
/// `Eq + Hash`; a stored key is kept for the life of its entry.
pub struct ValueStore<K, V> {
    name: String,
    index: ShardedIndex<K, V>,
    key_copy: CopyFn<K>,
    value_copy: CopyFn<V>,
    stats: StoreStats,
    closed: AtomicBool,
}

impl<K, V> ValueStore<K, V>
where
    K: Eq + Hash + 'static,
    V: 'static,
{
    // == Constructor ==
    /// Creates a store, resolving copy rules for `K` and `V` up front.
    ///
    /// Fails with `UnsupportedCopyType` if either type has no rule in `registry`.
    pub fn new(name: impl Into<String>, registry: &CopierRegistry, options: StoreOptions) -> Result<Self> {
        let name = name.into();
        let key_copy = registry.resolve::<K>()?;
        let value_copy = registry.resolve::<V>()?;

        info!(
            "Store '{}' created: shards={}, statistics={}",
            name,
            options.shards.max(1),
            options.statistics
        );

        Ok(Self {
            name,
            index: ShardedIndex::new(options.shards),
            key_copy,
            value_copy,
            stats: StoreStats::new(options.statistics),
            closed: AtomicBool::new(false),
        })
    }

    fn closed_error(&self) -> StoreError {
        warn!("Rejected call on closed store '{}'", self.name);
        StoreError::StoreClosed(self.name.clone())
    }

    /// Runs `op` against the index unless the store is closed.
    ///
    /// The store-wide flag rejects calls that start after any `close` began,
    /// even while that close is still sealing shards. The per-shard flag
    /// catches calls that were already past this check.
    fn run<T>(&self, op: impl FnOnce(&ShardedIndex<K, V>) -> std::result::Result<T, Closed>) -> Result<T> {
        if self.closed.load(Ordering::Acquire) {
            return Err(self.closed_error());
        }
        op(&self.index).map_err(|Closed| self.closed_error())
    }

    fn copy_key(&self, key: &K) -> K {
        self.key_copy.copy(key)
    }

    fn copy_value(&self, value: &V) -> V {
        self.value_copy.copy(value)
    }

    // == Get ==
    /// Returns a copy of the value stored under a key equal to `key`.
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        let value = self.run(|index| index.lookup_with(key, |stored| self.copy_value(stored)))?;
        self.stats.record_lookup(value.is_some());
        debug!("get on '{}': hit={}", self.name, value.is_some());
        Ok(value)
    }

    /// Returns true if a key equal to `key` is present.
    pub fn contains_key(&self, key: &K) -> Result<bool> {
        self.run(|index| index.contains(key))
    }

    /// Returns copies of every present entry among `keys`. Absent keys are omitted.
    pub fn get_all<'a, I>(&self, keys: I) -> Result<HashMap<K, V>>
    where
        I: IntoIterator<Item = &'a K>,
    {
        let mut found = HashMap::new();
        for key in keys {
            if let Some(value) = self.get(key)? {
                found.insert(self.copy_key(key), value);
            }
        }
        Ok(found)
    }

    // == Put ==
    /// Stores a copy of `value` under `key`, replacing any current value.
    pub fn put(&self, key: &K, value: &V) -> Result<()> {
        self.get_and_put_inner(key, value).map(|_| ())
    }

    /// Stores every pair. Each pair is atomic on its own; the batch is not.
    pub fn put_all<'a, I>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a K, &'a V)>,
    {
        for (key, value) in entries {
            self.put(key, value)?;
        }
        Ok(())
    }

    // == Get And Put ==
    /// Stores a copy of `value` and returns the value it displaced, if any.
    ///
    /// Read and write happen under one shard lock, so concurrent calls on equal
    /// keys observe each other's values in some total order.
    pub fn get_and_put(&self, key: &K, value: &V) -> Result<Option<V>> {
        let previous = self.get_and_put_inner(key, value)?;
        self.stats.record_lookup(previous.is_some());
        Ok(previous)
    }

    fn get_and_put_inner(&self, key: &K, value: &V) -> Result<Option<V>> {
        let value = self.copy_value(value);
        let previous = self.run(|index| index.upsert(key, |k| self.copy_key(k), value))?;
        self.stats.record_put();
        debug!("put on '{}': replaced={}", self.name, previous.is_some());
        Ok(previous)
    }

    // == Conditional Put ==
    /// Stores a copy of `value` only if no equal key is present.
    ///
    /// Returns true if the entry was installed.
    pub fn put_if_absent(&self, key: &K, value: &V) -> Result<bool> {
        let installed = self.run(|index| {
            index.insert_if_absent(key, |k| self.copy_key(k), || self.copy_value(value))
        })?;
        if installed {
            self.stats.record_put();
        }
        Ok(installed)
    }

    /// Replaces the value only if an equal key is present.
    pub fn replace(&self, key: &K, value: &V) -> Result<bool> {
        Ok(self.get_and_replace(key, value)?.is_some())
    }

    /// Replaces the value only if an equal key is present, returning the old value.
    pub fn get_and_replace(&self, key: &K, value: &V) -> Result<Option<V>> {
        let previous = self.run(|index| {
            index.update_with(key, |slot| std::mem::replace(slot, self.copy_value(value)))
        })?;
        self.stats.record_lookup(previous.is_some());
        if previous.is_some() {
            self.stats.record_put();
        }
        Ok(previous)
    }

    // == Remove ==
    /// Removes the entry for a key equal to `key` and returns its value.
    pub fn remove(&self, key: &K) -> Result<Option<V>> {
        let previous = self.run(|index| index.remove(key))?;
        if previous.is_some() {
            self.stats.record_removal();
        }
        debug!("remove on '{}': found={}", self.name, previous.is_some());
        Ok(previous)
    }

    /// Same as [`ValueStore::remove`].
    pub fn get_and_remove(&self, key: &K) -> Result<Option<V>> {
        let previous = self.remove(key)?;
        self.stats.record_lookup(previous.is_some());
        Ok(previous)
    }

    // == Clear ==
    /// Removes every entry. The store stays open.
    pub fn clear(&self) -> Result<()> {
        let removed = self.run(|index| index.clear())?;
        info!("Store '{}' cleared: {} entries removed", self.name, removed);
        Ok(())
    }

    // == Close ==
    /// Releases every entry; all later operations fail with `StoreClosed`.
    ///
    /// Calling it again is a no-op.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let released = self.index.close();
        info!("Store '{}' closed: {} entries released", self.name, released);
    }

    /// Returns true once [`ValueStore::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    // == Accessors ==
    /// Returns the store's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns current statistics.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.index.len())
    }
}

impl<K, V> ValueStore<K, V>
where
    K: Eq + Hash + 'static,
    V: PartialEq + 'static,
{
    // == Compare And Swap ==
    /// Replaces the value with a copy of `new` only if it currently equals `old`.
    pub fn replace_if_equals(&self, key: &K, old: &V, new: &V) -> Result<bool> {
        let swapped = self
            .run(|index| index.update_with(key, |slot| {
                if slot == old {
                    *slot = self.copy_value(new);
                    true
                } else {
                    false
                }
            }))?
            .unwrap_or(false);
        if swapped {
            self.stats.record_put();
        }
        Ok(swapped)
    }

    /// Removes the entry only if its value equals `value`.
    pub fn remove_if_equals(&self, key: &K, value: &V) -> Result<bool> {
        let removed = self.run(|index| index.remove_if(key, |current| current == value))?;
        if removed {
            self.stats.record_removal();
        }
        Ok(removed)
    }
}

impl<K, V> fmt::Debug for ValueStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueStore")
            .field("name", &self.name)
            .field("key_copy", &self.key_copy)
            .field("value_copy", &self.value_copy)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}
