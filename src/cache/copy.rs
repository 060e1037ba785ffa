//! Copy Strategy Module
//!
//! Per-type deep-copy rules used at the store boundary. A type is only
//! accepted as a key or value once a rule for it has been registered.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::cache::MutableInstant;
use crate::error::{Result, StoreError};

// == Copier Trait ==
/// Produces a value-equal duplicate that shares no mutable state with its source.
pub trait Copier<T>: Send + Sync {
    /// Returns an independent copy of `value`.
    fn copy(&self, value: &T) -> T;
}

impl<T, F> Copier<T> for F
where
    F: Fn(&T) -> T + Send + Sync,
{
    fn copy(&self, value: &T) -> T {
        self(value)
    }
}

// == Copy Fn ==
/// A resolved copy rule for one concrete type.
pub struct CopyFn<T> {
    copier: Arc<dyn Copier<T> + Send + Sync>,
}

impl<T> CopyFn<T> {
    /// Wraps a copier.
    pub fn new(copier: impl Copier<T> + 'static) -> Self {
        Self {
            copier: Arc::new(copier),
        }
    }

    /// Copies `value` with the wrapped rule.
    pub fn copy(&self, value: &T) -> T {
        self.copier.copy(value)
    }
}

impl<T> Clone for CopyFn<T> {
    fn clone(&self) -> Self {
        Self {
            copier: Arc::clone(&self.copier),
        }
    }
}

impl<T> fmt::Debug for CopyFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CopyFn<{}>", type_name::<T>())
    }
}

// == Copier Registry ==
/// Maps concrete types to their copy rules.
#[derive(Clone, Default)]
pub struct CopierRegistry {
    rules: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    names: Vec<&'static str>,
}

impl CopierRegistry {
    // == Constructors ==
    /// Creates an empty registry. Every key and value type must be registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with rules for strings, primitives, byte buffers,
    /// chrono timestamps, JSON values and [`MutableInstant`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register_clone::<String>()
            .register_clone::<bool>()
            .register_clone::<i8>()
            .register_clone::<i16>()
            .register_clone::<i32>()
            .register_clone::<i64>()
            .register_clone::<i128>()
            .register_clone::<isize>()
            .register_clone::<u8>()
            .register_clone::<u16>()
            .register_clone::<u32>()
            .register_clone::<u64>()
            .register_clone::<u128>()
            .register_clone::<usize>()
            .register_clone::<f64>()
            .register_clone::<Vec<u8>>()
            .register_clone::<DateTime<Utc>>()
            .register_clone::<NaiveDateTime>()
            .register_clone::<serde_json::Value>()
            // Clone on MutableInstant aliases its cell, so it needs its own rule.
            .register::<MutableInstant>(|value: &MutableInstant| value.deep_copy());
        registry
    }

    // == Register ==
    /// Registers `copier` for `T`, replacing any earlier rule.
    pub fn register<T: 'static>(&mut self, copier: impl Copier<T> + 'static) -> &mut Self {
        let previous = self
            .rules
            .insert(TypeId::of::<T>(), Arc::new(CopyFn::new(copier)));
        if previous.is_none() {
            self.names.push(type_name::<T>());
        }
        self
    }

    /// Registers `Clone` as the copy rule for `T`.
    ///
    /// Only sound for types whose `Clone` shares no mutable state.
    pub fn register_clone<T: Clone + 'static>(&mut self) -> &mut Self {
        self.register::<T>(|value: &T| value.clone())
    }

    // == Resolve ==
    /// Returns the copy rule for `T`, or `UnsupportedCopyType`.
    pub fn resolve<T: 'static>(&self) -> Result<CopyFn<T>> {
        self.rules
            .get(&TypeId::of::<T>())
            .and_then(|rule| rule.downcast_ref::<CopyFn<T>>())
            .cloned()
            .ok_or(StoreError::UnsupportedCopyType(type_name::<T>()))
    }

    /// Returns true if a rule is registered for `T`.
    pub fn supports<T: 'static>(&self) -> bool {
        self.rules.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of registered types.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for CopierRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopierRegistry")
            .field("types", &self.names)
            .finish()
    }
}
