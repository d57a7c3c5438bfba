//! Cache Module
//!
//! Bounded in-memory caching with TTL expiration and LRU eviction, used to
//! hold resolved host addresses on the dial path.

mod entry;
mod list;
mod stats;
mod store;


// Re-export public types
pub use entry::Entry;
pub use stats::CacheStats;
pub use store::TtlCache;
