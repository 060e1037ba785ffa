//! Cache Manager Module
//!
//! Owns named stores and their lifecycle: create, look up, destroy, close.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::cache::{CopierRegistry, StoreOptions, ValueStore};
use crate::error::{Result, StoreError};

struct ManagerState<K, V> {
    caches: HashMap<String, Arc<ValueStore<K, V>>>,
    closed: bool,
}

// == Cache Manager ==
/// Registry of named [`ValueStore`]s sharing one copy-rule registry.
pub struct CacheManager<K, V> {
    registry: CopierRegistry,
    options: StoreOptions,
    state: RwLock<ManagerState<K, V>>,
}

impl<K, V> CacheManager<K, V>
where
    K: Eq + Hash + 'static,
    V: 'static,
{
    // == Constructor ==
    /// Creates a manager whose stores copy with `registry` and use `options`.
    pub fn new(registry: CopierRegistry, options: StoreOptions) -> Self {
        Self {
            registry,
            options,
            state: RwLock::new(ManagerState {
                caches: HashMap::new(),
                closed: false,
            }),
        }
    }

    // == Create ==
    /// Creates and registers a store named `name`.
    pub fn create_cache(&self, name: &str) -> Result<Arc<ValueStore<K, V>>> {
        let mut state = self.state.write();
        if state.closed {
            return Err(StoreError::ManagerClosed);
        }
        if state.caches.contains_key(name) {
            return Err(StoreError::CacheAlreadyExists(name.to_string()));
        }

        let store = Arc::new(ValueStore::new(name, &self.registry, self.options)?);
        state.caches.insert(name.to_string(), Arc::clone(&store));
        Ok(store)
    }

    // == Lookup ==
    /// Returns the store named `name`, if registered.
    pub fn get_cache(&self, name: &str) -> Option<Arc<ValueStore<K, V>>> {
        self.state.read().caches.get(name).cloned()
    }

    /// Returns the store named `name` or `CacheNotFound`.
    pub fn cache(&self, name: &str) -> Result<Arc<ValueStore<K, V>>> {
        self.get_cache(name)
            .ok_or_else(|| StoreError::CacheNotFound(name.to_string()))
    }

    /// Returns the registered names, sorted.
    pub fn cache_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.read().caches.keys().cloned().collect();
        names.sort();
        names
    }

    // == Destroy ==
    /// Closes the store named `name` and unregisters it.
    ///
    /// Handles still held by callers fail with `StoreClosed` from then on.
    pub fn destroy_cache(&self, name: &str) -> Result<()> {
        let store = self
            .state
            .write()
            .caches
            .remove(name)
            .ok_or_else(|| StoreError::CacheNotFound(name.to_string()))?;
        store.close();
        info!("Cache '{}' destroyed", name);
        Ok(())
    }

    // == Close ==
    /// Closes every store and rejects later creation. Safe to call more than once.
    pub fn close(&self) {
        let stores: Vec<Arc<ValueStore<K, V>>> = {
            let mut state = self.state.write();
            if state.closed {
                return;
            }
            state.closed = true;
            state.caches.drain().map(|(_, store)| store).collect()
        };

        for store in &stores {
            store.close();
        }
        info!("Cache manager closed: {} caches released", stores.len());
    }

    /// Returns true once [`CacheManager::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.state.read().closed
    }
}

impl<K, V> fmt::Debug for CacheManager<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("CacheManager")
            .field("caches", &state.caches.keys().collect::<Vec<_>>())
            .field("closed", &state.closed)
            .field("options", &self.options)
            .finish()
    }
}
