//! dialcache - DNS-caching dialer backed by a bounded TTL + LRU host cache
//!
//! The core is [`TtlCache`], a fixed-capacity LRU cache whose entries also
//! carry a time-to-live; expired entries are purged lazily, on the next
//! read that touches them. [`CachingResolver`] uses it to memoize DNS
//! answers, and [`CachedDialer`] dials outbound TCP connections through
//! that resolver.

pub mod cache;
pub mod config;
pub mod error;
pub mod net;

pub use cache::{CacheStats, TtlCache};
pub use config::DialConfig;
pub use error::{Error, Result};
pub use net::{CachedDialer, CachingResolver, ResolveHost, SystemResolver};
