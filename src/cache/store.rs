//! Cache Store Module
//!
//! Bounded key-value cache combining a HashMap index with an arena-backed
//! recency list for LRU eviction, plus per-entry TTL expiration.
//!
//! Expiration is lazy: an expired entry is purged the next time a lookup
//! touches it, and there is no background sweeper. An expired entry that is
//! never read again keeps its slot until LRU pressure or an overwrite
//! reclaims it. That trades some capacity efficiency under low read churn
//! for a cache that stays allocation-free and cheap to lock on the dial
//! path; `purge_expired` is available when a caller wants to reclaim slots
//! eagerly.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::list::{NodeId, RecencyList};
use crate::cache::{CacheStats, Entry};
use crate::error::{Error, Result};

// == Ttl Cache ==
/// Fixed-capacity LRU cache with per-entry TTL.
///
/// Operations take `&mut self`; shared use wraps the cache in a single
/// exclusive lock, one lock span per logical operation (both `get` and
/// `put` mutate recency order, so a read lock would not help).
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key to node-handle index; holds exactly the same live entries as
    /// the recency list at every quiescent point
    index: HashMap<String, NodeId>,
    /// Recency order, front = most recently used
    order: RecencyList<Entry<V>>,
    /// Maximum number of entries, fixed at construction
    capacity: usize,
    /// Performance counters
    stats: CacheStats,
}

impl<V> TtlCache<V> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A zero capacity is rejected up front rather than producing a cache
    /// that can never hold anything.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(Self {
            index: HashMap::with_capacity(capacity),
            order: RecencyList::with_capacity(capacity),
            capacity,
            stats: CacheStats::new(),
        })
    }

    // == Put ==
    /// Stores a value under `key`, expiring `ttl` from now.
    ///
    /// An existing entry for the key is replaced entirely, value and TTL
    /// both. When the cache is full and the key is new, the least recently
    /// used entry is evicted first. Empty keys and zero TTLs are accepted.
    ///
    /// Always returns `Ok(())` today; the error path is reserved for
    /// back-pressure signaling.
    pub fn put(&mut self, key: String, value: V, ttl: Duration) -> Result<()> {
        // Overwrite: drop the old entry outright, the new one starts fresh
        // at the front.
        if let Some(id) = self.index.remove(&key) {
            self.order.remove(id);
        } else if self.order.len() >= self.capacity {
            self.evict_lru();
        }

        let id = self.order.push_front(Entry::new(key.clone(), value, ttl));
        self.index.insert(key, id);
        self.stats.set_total_entries(self.order.len());
        Ok(())
    }

    // == Get ==
    /// Looks up `key`, returning a clone of the live value.
    ///
    /// An entry whose TTL has elapsed is purged from both the index and
    /// the recency list before reporting a miss, so stale entries cannot
    /// occupy capacity past their next read. A live hit promotes the entry
    /// to most recently used.
    pub fn get(&mut self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let Some(&id) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let expired = self.order.get(id).map_or(true, |entry| entry.is_expired());
        if expired {
            // Lazy expiration: remove from both structures on read.
            self.index.remove(key);
            self.order.remove(id);
            self.stats.set_total_entries(self.order.len());
            self.stats.record_expiration();
            self.stats.record_miss();
            return None;
        }

        self.order.move_to_front(id);
        self.stats.record_hit();
        self.order.get(id).map(|entry| entry.value.clone())
    }

    // == Purge Expired ==
    /// Removes every expired entry, returning how many were purged.
    ///
    /// Optional eager counterpart to the lazy on-read purge; nothing in
    /// the crate calls it on a schedule.
    pub fn purge_expired(&mut self) -> usize {
        let dead: Vec<(NodeId, String)> = self
            .order
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(id, entry)| (id, entry.key.clone()))
            .collect();

        for (id, key) in &dead {
            self.index.remove(key);
            self.order.remove(*id);
            self.stats.record_expiration();
        }

        self.stats.set_total_entries(self.order.len());
        dead.len()
    }

    // == Length ==
    /// Returns the current number of entries, live or not yet purged.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Capacity ==
    /// Returns the fixed maximum entry count.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Stats ==
    /// Returns a snapshot of the performance counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.order.len());
        stats
    }

    // == Eviction ==
    /// Removes the least recently used entry.
    fn evict_lru(&mut self) {
        let Some(id) = self.order.back() else {
            return;
        };
        if let Some(entry) = self.order.remove(id) {
            self.index.remove(&entry.key);
            self.stats.record_eviction();
        }
    }

    // == Test Inspection ==
    /// Keys in recency order, most recent first. Test-only.
    #[cfg(test)]
    pub(crate) fn keys_by_recency(&self) -> Vec<String> {
        self.order.iter().map(|(_, e)| e.key.clone()).collect()
    }

    /// Stop-the-world consistency check for tests: the index and the
    /// recency list must hold exactly the same set of entries, the size
    /// must not exceed capacity, and the list linkage must be intact.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.order.assert_consistent();
        assert_eq!(self.index.len(), self.order.len(), "index/order size split");
        assert!(
            self.order.len() <= self.capacity,
            "size {} exceeds capacity {}",
            self.order.len(),
            self.capacity
        );
        for (key, &id) in &self.index {
            let entry = self
                .order
                .get(id)
                .unwrap_or_else(|| panic!("indexed key '{key}' has no node"));
            assert_eq!(&entry.key, key, "node key does not match index key");
        }
    }
}
