//! Cache module for memoizing route responses
//!
//! This module provides an in-memory cache manager with a fixed TTL
//! (time-to-live). Staleness up to the TTL is accepted: there is no
//! invalidation when the upstream website changes.

mod manager;

pub use manager::{CacheManager, CachedData, DEFAULT_TTL_SECS};
