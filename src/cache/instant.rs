//! Mutable Instant Module
//!
//! A millisecond timestamp held in a shared cell. Cloning a `MutableInstant`
//! yields a second handle to the same cell, so a write through either handle
//! is seen by both. Stores must copy it with [`MutableInstant::deep_copy`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

// == Mutable Instant ==
/// A point in time, in Unix milliseconds, that can be changed in place.
#[derive(Clone, Default)]
pub struct MutableInstant {
    millis: Arc<AtomicI64>,
}

impl MutableInstant {
    // == Constructors ==
    /// Creates an instant at `millis` since the Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(millis)),
        }
    }

    /// Creates an instant at the current time.
    pub fn now() -> Self {
        Self::from_millis(Utc::now().timestamp_millis())
    }

    /// Creates an instant from a chrono timestamp.
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self::from_millis(datetime.timestamp_millis())
    }

    // == Accessors ==
    /// Returns the instant in Unix milliseconds.
    pub fn get_time(&self) -> i64 {
        self.millis.load(Ordering::Acquire)
    }

    /// Moves the instant to `millis`. Visible through every aliasing handle.
    pub fn set_time(&self, millis: i64) {
        self.millis.store(millis, Ordering::Release);
    }

    /// Converts to a chrono timestamp, or None if out of chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.get_time()).single()
    }

    // == Copy ==
    /// Returns an equal instant backed by a fresh cell.
    pub fn deep_copy(&self) -> Self {
        Self::from_millis(self.get_time())
    }

    /// Returns true if both handles share one cell.
    pub fn is_alias_of(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.millis, &other.millis)
    }
}

impl PartialEq for MutableInstant {
    fn eq(&self, other: &Self) -> bool {
        self.get_time() == other.get_time()
    }
}

impl Eq for MutableInstant {}

impl Hash for MutableInstant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.get_time().hash(state);
    }
}

impl From<DateTime<Utc>> for MutableInstant {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::from_datetime(datetime)
    }
}

impl fmt::Debug for MutableInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MutableInstant").field(&self.get_time()).finish()
    }
}

impl fmt::Display for MutableInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(datetime) => write!(f, "{}", datetime.to_rfc3339()),
            None => write!(f, "{}ms", self.get_time()),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_aliases_cell() {
        let instant = MutableInstant::from_millis(10);
        let alias = instant.clone();

        instant.set_time(20);
        assert_eq!(alias.get_time(), 20);
        assert!(alias.is_alias_of(&instant));
    }

    #[test]
    fn test_deep_copy_is_detached() {
        let instant = MutableInstant::from_millis(10);
        let copy = instant.deep_copy();

        instant.set_time(20);
        assert_eq!(copy.get_time(), 10);
        assert!(!copy.is_alias_of(&instant));
    }

    #[test]
    fn test_equality_by_value() {
        let a = MutableInstant::from_millis(42);
        let b = MutableInstant::from_millis(42);
        assert_eq!(a, b);
        assert!(!a.is_alias_of(&b));

        b.set_time(43);
        assert_ne!(a, b);
    }

    #[test]
    fn test_now_reads_wall_clock() {
        let before = Utc::now().timestamp_millis();
        let instant = MutableInstant::now();
        let after = Utc::now().timestamp_millis();

        assert!((before..=after).contains(&instant.get_time()));
        assert!(instant.to_datetime().is_some());
    }

    #[test]
    fn test_datetime_conversion() {
        let datetime = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let instant = MutableInstant::from(datetime);

        assert_eq!(instant.get_time(), 1_700_000_000_123);
        assert_eq!(instant.to_datetime(), Some(datetime));
        assert!(instant.to_string().starts_with("2023-11-14"));
    }
}
