//! Net Module
//!
//! The consumers of the host cache: a caching DNS resolver and the TCP
//! dialer built on top of it.

pub mod dialer;
pub mod resolver;

pub use dialer::CachedDialer;
pub use resolver::{CachingResolver, ResolveHost, SystemResolver};
