//! In-memory query cache with invalidation.
//!
//! Entries are keyed by query and expire after a fixed duration. Every
//! invalidation bumps a generation counter; a fetch records the generation it
//! started in and its result is only stored if no invalidation happened in
//! between, so a slow fetch can never resurrect data a mutation made stale.

use log::debug;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    fetched_at: Instant,
}

struct Inner<K, V> {
    generation: u64,
    entries: HashMap<K, Entry<V>>,
}

pub struct QueryCache<K, V> {
    inner: Mutex<Inner<K, V>>,
    stale_after: Duration,
}

/// Token handed out when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

impl<K: Eq + Hash + Clone + std::fmt::Debug, V: Clone> QueryCache<K, V> {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                generation: 0,
                entries: HashMap::new(),
            }),
            stale_after,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the cached value if it is still fresh.
    pub fn get(&self, key: &K) -> Option<V> {
        let inner = self.lock();
        inner
            .entries
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.stale_after)
            .map(|entry| entry.value.clone())
    }

    /// Marks the start of a fetch.
    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket(self.lock().generation)
    }

    /// Stores a fetched value. Returns false, and stores nothing, when the
    /// cache was invalidated after `ticket` was issued.
    pub fn store(&self, key: K, value: V, ticket: FetchTicket) -> bool {
        let mut inner = self.lock();
        if ticket.0 != inner.generation {
            debug!("Discarding result for {:?} fetched before invalidation", key);
            return false;
        }
        inner.entries.insert(
            key,
            Entry {
                value,
                fetched_at: Instant::now(),
            },
        );
        true
    }

    /// Drops every entry and outdates in-flight fetches.
    pub fn invalidate(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.entries.clear();
        debug!("Query cache invalidated (generation {})", inner.generation);
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_get() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let ticket = cache.begin_fetch();
        assert!(cache.store("a", 1, ticket));
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"b"), None);
    }

    #[test]
    fn test_entries_expire() {
        let cache = QueryCache::new(Duration::ZERO);
        let ticket = cache.begin_fetch();
        cache.store("a", 1, ticket);
        assert_eq!(cache.get(&"a"), None);
    }

    #[test]
    fn test_invalidate_clears_entries() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.store("a", 1, cache.begin_fetch());
        cache.store("b", 2, cache.begin_fetch());
        assert_eq!(cache.len(), 2);

        cache.invalidate();

        assert!(cache.is_empty());
        assert_eq!(cache.get(&"a"), None);
    }

    #[test]
    fn test_fetch_straddling_invalidation_is_not_stored() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let ticket = cache.begin_fetch();

        cache.invalidate();

        assert!(!cache.store("a", 1, ticket));
        assert_eq!(cache.get(&"a"), None);

        let ticket = cache.begin_fetch();
        assert!(cache.store("a", 2, ticket));
        assert_eq!(cache.get(&"a"), Some(2));
    }
}
