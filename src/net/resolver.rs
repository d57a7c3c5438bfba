//! Caching DNS Resolver Module
//!
//! Wraps host resolution with the bounded TTL cache so repeated dials of
//! the same hostname skip the resolver.

use std::future::Future;
use std::io;
use std::net::IpAddr;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, TtlCache};
use crate::error::Result;

// == Resolver Trait ==
/// Host-to-addresses resolution seam.
///
/// The caching layer is generic over this so tests can substitute a
/// scripted resolver.
pub trait ResolveHost {
    /// Resolves a hostname to its addresses.
    fn lookup_host(&self, host: &str) -> impl Future<Output = io::Result<Vec<IpAddr>>> + Send;
}

// == System Resolver ==
/// Resolution through the operating system via `tokio::net::lookup_host`.
#[derive(Debug, Clone, Default)]
pub struct SystemResolver;

impl ResolveHost for SystemResolver {
    fn lookup_host(&self, host: &str) -> impl Future<Output = io::Result<Vec<IpAddr>>> + Send {
        let literal: Option<IpAddr> = host.parse().ok();
        // lookup_host wants host:port; port 0 is discarded after resolution.
        let query = if host.contains(':') {
            format!("[{host}]:0")
        } else {
            format!("{host}:0")
        };

        async move {
            if let Some(ip) = literal {
                return Ok(vec![ip]);
            }
            let addrs = tokio::net::lookup_host(query).await?;
            Ok(addrs.map(|sa| sa.ip()).collect())
        }
    }
}

// == Caching Resolver ==
/// Resolver wrapper that caches successful lookups for a configured TTL.
///
/// The cache sits behind a single exclusive lock; each cache operation is
/// one lock span, and the lock is never held across the inner resolution
/// await.
#[derive(Debug)]
pub struct CachingResolver<R> {
    inner: R,
    cache: Mutex<TtlCache<Vec<IpAddr>>>,
    ttl: Duration,
}

impl<R: ResolveHost> CachingResolver<R> {
    // == Constructor ==
    /// Creates a caching resolver holding at most `cache_entries` hosts,
    /// each cached for `ttl`.
    pub fn new(inner: R, cache_entries: usize, ttl: Duration) -> Result<Self> {
        Ok(Self {
            inner,
            cache: Mutex::new(TtlCache::new(cache_entries)?),
            ttl,
        })
    }

    // == Lookup ==
    /// Resolves `host`, serving from the cache when a live entry exists.
    ///
    /// Only successful, non-empty resolutions are cached; errors and empty
    /// answers always reach the inner resolver again on the next call.
    /// Concurrent misses for the same host may each resolve; the last
    /// completed lookup wins the cache slot.
    pub async fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        if let Some(addrs) = self.cache.lock().get(host) {
            debug!(host, "dns cache hit");
            return Ok(addrs);
        }

        let addrs = match self.inner.lookup_host(host).await {
            Ok(addrs) => addrs,
            Err(err) => {
                warn!(host, error = %err, "host resolution failed");
                return Err(err);
            }
        };
        info!(host, ips = ?addrs, "resolved host");

        if !addrs.is_empty() {
            let _ = self
                .cache
                .lock()
                .put(host.to_string(), addrs.clone(), self.ttl);
        }
        Ok(addrs)
    }

    // == Stats ==
    /// Snapshot of the underlying cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }
}
