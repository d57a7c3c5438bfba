//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cache entry: the key it was stored under, the value, and its
/// absolute expiration instant.
///
/// The key is carried inside the entry so that an eviction picked from the
/// recency list can also be removed from the key index without a reverse
/// lookup.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    /// Key this entry is indexed under
    pub key: String,
    /// The stored value
    pub value: V,
    /// Creation instant
    pub created_at: Instant,
    /// Instant at which the entry expires
    pub expires_at: Instant,
}

impl<V> Entry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    ///
    /// A zero `ttl` produces an entry that is already expired on its next
    /// read; that is accepted rather than rejected.
    pub fn new(key: String, value: V, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            key,
            value,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired when the current instant is
    /// greater than or equal to `expires_at`, so a zero-TTL entry is never
    /// returned by a read.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining TTL, saturating at zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
