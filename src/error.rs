//! Error types for the dialer and its host cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Dial Error Enum ==
/// Unified error type for the crate.
///
/// Cache lookups never error; absence and expiration are reported through
/// `Option`, so the variants here cover construction and dialing only.
#[derive(Error, Debug)]
pub enum Error {
    /// Cache constructed with a non-positive capacity
    #[error("cache capacity must be positive, got {0}")]
    InvalidCapacity(usize),

    /// Dial address could not be split into host and port
    #[error("invalid address '{0}': expected host:port")]
    InvalidAddress(String),

    /// Underlying resolution or connect failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;
