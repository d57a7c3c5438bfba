//! Configuration Module
//!
//! Handles loading dialer configuration from environment variables.

use std::env;
use std::time::Duration;

/// Dialer configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct DialConfig {
    /// Maximum number of hosts the DNS cache can hold
    pub dns_cache_entries: usize,
    /// How long a resolved address list stays usable
    pub dns_cache_ttl: Duration,
    /// Per-address connect timeout
    pub dial_timeout: Duration,
}

impl DialConfig {
    /// Creates a new DialConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DNS_CACHE_ENTRIES` - Maximum cached hosts (default: 1024)
    /// - `DNS_CACHE_TTL_SECS` - Resolution TTL in seconds (default: 60)
    /// - `DIAL_TIMEOUT_SECS` - Connect timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        Self {
            dns_cache_entries: env::var("DNS_CACHE_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
            dns_cache_ttl: Duration::from_secs(
                env::var("DNS_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60),
            ),
            dial_timeout: Duration::from_secs(
                env::var("DIAL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            dns_cache_entries: 1024,
            dns_cache_ttl: Duration::from_secs(60),
            dial_timeout: Duration::from_secs(30),
        }
    }
}
