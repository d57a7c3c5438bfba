//! Cached Dialer Module
//!
//! Outbound TCP dialing that resolves hostnames through the caching
//! resolver, tries each resolved address in turn, and falls back to dialing
//! the address as given when every per-address attempt fails.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::warn;

use crate::cache::CacheStats;
use crate::config::DialConfig;
use crate::error::{Error, Result};
use crate::net::resolver::{CachingResolver, ResolveHost, SystemResolver};

// == Cached Dialer ==
/// TCP dialer with cached DNS resolution.
#[derive(Debug)]
pub struct CachedDialer<R = SystemResolver> {
    resolver: CachingResolver<R>,
    dial_timeout: Duration,
}

impl CachedDialer<SystemResolver> {
    // == Constructor ==
    /// Creates a dialer using system resolution, configured by `config`.
    pub fn new(config: &DialConfig) -> Result<Self> {
        let resolver =
            CachingResolver::new(SystemResolver, config.dns_cache_entries, config.dns_cache_ttl)?;
        Ok(Self {
            resolver,
            dial_timeout: config.dial_timeout,
        })
    }
}

impl<R: ResolveHost> CachedDialer<R> {
    /// Creates a dialer around an already-built resolver.
    pub fn with_resolver(resolver: CachingResolver<R>, dial_timeout: Duration) -> Self {
        Self {
            resolver,
            dial_timeout,
        }
    }

    // == Connect ==
    /// Connects to `address` (`host:port`).
    ///
    /// IP-literal hosts are dialed directly without touching the cache.
    /// Hostnames are resolved through the caching resolver and each
    /// address is tried in order under the configured timeout; failed
    /// attempts are logged and the next address is tried. If resolution
    /// fails or no attempt succeeds, the address is handed to the system
    /// as-is for one final direct dial.
    pub async fn connect(&self, address: &str) -> Result<TcpStream> {
        let (host, port) = split_host_port(address)?;

        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(self.connect_addr(SocketAddr::new(ip, port)).await?);
        }

        let ips = match self.resolver.lookup(host).await {
            Ok(ips) => ips,
            // Resolution failure still gets the direct-dial fallback below.
            Err(err) => {
                warn!(address, error = %err, "resolution failed, falling back to direct dial");
                Vec::new()
            }
        };

        for ip in ips {
            let addr = SocketAddr::new(ip, port);
            match self.connect_addr(addr).await {
                Ok(stream) => return Ok(stream),
                Err(err) => {
                    warn!(address, %addr, error = %err, "connect attempt failed");
                }
            }
        }

        let stream = self.connect_direct(address).await?;
        Ok(stream)
    }

    // == Stats ==
    /// Snapshot of the resolver's cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.resolver.cache_stats()
    }

    /// Connects to a resolved address under the dial timeout.
    async fn connect_addr(&self, addr: SocketAddr) -> io::Result<TcpStream> {
        match timeout(self.dial_timeout, TcpStream::connect(addr)).await {
            Ok(result) => result,
            Err(_) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("connect to {addr} timed out"),
            )),
        }
    }

    /// Last-resort dial of the unmodified address, resolved by the system.
    async fn connect_direct(&self, address: &str) -> io::Result<TcpStream> {
        match timeout(self.dial_timeout, TcpStream::connect(address)).await {
            Ok(result) => result,
            Err(_) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("connect to {address} timed out"),
            )),
        }
    }
}

// == Address Splitting ==
/// Splits `host:port`, handling the `[v6]:port` bracket form.
fn split_host_port(address: &str) -> Result<(&str, u16)> {
    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| Error::InvalidAddress(address.to_string()))?;

    let port: u16 = port
        .parse()
        .map_err(|_| Error::InvalidAddress(address.to_string()))?;

    let host = if let Some(inner) = host.strip_prefix('[') {
        inner
            .strip_suffix(']')
            .ok_or_else(|| Error::InvalidAddress(address.to_string()))?
    } else {
        host
    };

    Ok((host, port))
}
