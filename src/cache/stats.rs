//! Store Statistics Module
//!
//! Tracks store activity: hits, misses, puts and removals.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Store Stats ==
/// Lock-free activity counters shared by every caller of a store.
#[derive(Debug)]
pub struct StoreStats {
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
    puts: AtomicU64,
    removals: AtomicU64,
}

impl StoreStats {
    // == Constructor ==
    /// Creates counters at zero. When `enabled` is false nothing is recorded.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            puts: AtomicU64::new(0),
            removals: AtomicU64::new(0),
        }
    }

    fn bump(&self, counter: &AtomicU64) {
        if self.enabled {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records a lookup that found an entry.
    pub fn record_hit(&self) {
        self.bump(&self.hits);
    }

    /// Records a lookup that found nothing.
    pub fn record_miss(&self) {
        self.bump(&self.misses);
    }

    /// Records a lookup outcome.
    pub fn record_lookup(&self, hit: bool) {
        if hit {
            self.record_hit();
        } else {
            self.record_miss();
        }
    }

    /// Records a stored value.
    pub fn record_put(&self) {
        self.bump(&self.puts);
    }

    /// Records a removed entry.
    pub fn record_removal(&self) {
        self.bump(&self.removals);
    }

    /// Returns true if counters are being recorded.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // == Snapshot ==
    /// Returns the current counters with the given entry count.
    pub fn snapshot(&self, total_entries: usize) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            total_entries,
        }
    }
}

impl Default for StoreStats {
    fn default() -> Self {
        Self::new(true)
    }
}

// == Stats Snapshot ==
/// Point-in-time copy of a store's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Lookups that found an entry
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Values stored
    pub puts: u64,
    /// Entries removed individually
    pub removals: u64,
    /// Current number of entries
    pub total_entries: usize,
}

impl StatsSnapshot {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = StoreStats::default();
        assert_eq!(stats.snapshot(0), StatsSnapshot::default());
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(StatsSnapshot::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stats = StoreStats::new(true);
        stats.record_lookup(true);
        stats.record_lookup(false);
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.snapshot(0).hit_rate(), 0.5);
    }

    #[test]
    fn test_record_puts_and_removals() {
        let stats = StoreStats::new(true);
        stats.record_put();
        stats.record_put();
        stats.record_removal();

        let snapshot = stats.snapshot(1);
        assert_eq!(snapshot.puts, 2);
        assert_eq!(snapshot.removals, 1);
        assert_eq!(snapshot.total_entries, 1);
    }

    #[test]
    fn test_disabled_stats_record_nothing() {
        let stats = StoreStats::new(false);
        stats.record_hit();
        stats.record_put();

        assert!(!stats.is_enabled());
        assert_eq!(stats.snapshot(3).hits, 0);
        assert_eq!(stats.snapshot(3).puts, 0);
    }
}
