//! Concurrency tests for per-key atomicity
//!
//! Compound operations on equal keys must never lose an update, and close
//! must leave no entry behind regardless of in-flight writers.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use value_cache::{CopierRegistry, StoreError, StoreOptions, ValueStore};

const THREADS: u64 = 8;
const OPS_PER_THREAD: u64 = 500;

fn counter_store(shards: usize) -> Arc<ValueStore<String, u64>> {
    let options = StoreOptions {
        shards,
        statistics: true,
    };
    Arc::new(ValueStore::new("counters", &CopierRegistry::with_defaults(), options).unwrap())
}

#[test]
fn test_get_and_put_never_loses_a_value() {
    let store = counter_store(4);
    let key = "shared".to_string();

    // Every installed value is displaced exactly once, except the last one.
    let displaced: Vec<Option<u64>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let store = &store;
                let key = &key;
                scope.spawn(move || {
                    (0..OPS_PER_THREAD)
                        .map(|i| store.get_and_put(key, &(t * OPS_PER_THREAD + i)).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect()
    });

    let absent = displaced.iter().filter(|previous| previous.is_none()).count();
    assert_eq!(absent, 1, "only the first writer may see an empty slot");

    let mut seen: HashSet<u64> = displaced.into_iter().flatten().collect();
    let last = store.get(&key).unwrap().unwrap();
    assert!(seen.insert(last), "final value must not also have been displaced");
    assert_eq!(seen.len() as u64, THREADS * OPS_PER_THREAD);
}

#[test]
fn test_replace_if_equals_increments_are_atomic() {
    let store = counter_store(2);
    let key = "hits".to_string();
    store.put(&key, &0).unwrap();

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..OPS_PER_THREAD {
                    loop {
                        let current = store.get(&key).unwrap().unwrap();
                        if store.replace_if_equals(&key, &current, &(current + 1)).unwrap() {
                            break;
                        }
                    }
                }
            });
        }
    });

    assert_eq!(store.get(&key).unwrap(), Some(THREADS * OPS_PER_THREAD));
}

#[test]
fn test_put_if_absent_installs_once() {
    let store = counter_store(8);
    let key = "once".to_string();

    let installed: usize = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let store = &store;
                let key = &key;
                scope.spawn(move || usize::from(store.put_if_absent(key, &t).unwrap()))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(installed, 1);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_distinct_keys_proceed_independently() {
    let store = counter_store(16);

    thread::scope(|scope| {
        for t in 0..THREADS {
            let store = &store;
            scope.spawn(move || {
                for i in 0..OPS_PER_THREAD {
                    store.put(&format!("{}-{}", t, i), &i).unwrap();
                }
            });
        }
    });

    assert_eq!(store.len() as u64, THREADS * OPS_PER_THREAD);
    assert_eq!(store.stats().puts, THREADS * OPS_PER_THREAD);
}

#[test]
fn test_close_during_writes_leaves_store_empty() {
    let store = counter_store(4);

    thread::scope(|scope| {
        for t in 0..THREADS {
            let store = &store;
            scope.spawn(move || {
                for i in 0..OPS_PER_THREAD {
                    match store.put(&format!("{}-{}", t, i), &i) {
                        Ok(()) => {}
                        Err(StoreError::StoreClosed(_)) => break,
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
            });
        }
        scope.spawn(|| store.close());
    });

    assert!(store.is_closed());
    assert_eq!(store.len(), 0);
}

#[test]
fn test_second_close_rejects_calls_while_first_is_blocked() {
    const SLOW: u64 = u64::MAX;

    // Copying SLOW parks the reader inside its shard's read lock.
    let mut registry = CopierRegistry::with_defaults();
    registry.register::<u64>(|value: &u64| {
        if *value == SLOW {
            thread::sleep(Duration::from_millis(400));
        }
        *value
    });
    let options = StoreOptions {
        shards: 8,
        statistics: false,
    };
    let store: ValueStore<String, u64> = ValueStore::new("slow", &registry, options).unwrap();
    store.put(&"slow".to_string(), &SLOW).unwrap();

    thread::scope(|scope| {
        scope.spawn(|| store.get(&"slow".to_string()));
        thread::sleep(Duration::from_millis(50));

        // Blocks on the shard held by the reader.
        scope.spawn(|| store.close());
        thread::sleep(Duration::from_millis(50));

        store.close();
        let accepted = (0..64)
            .filter(|i| store.put(&format!("late-{}", i), &1).is_ok())
            .count();
        assert_eq!(accepted, 0, "no call may succeed once close() has returned");
        assert!(matches!(
            store.get(&"late-0".to_string()),
            Err(StoreError::StoreClosed(_))
        ));
    });

    assert_eq!(store.len(), 0);
}
