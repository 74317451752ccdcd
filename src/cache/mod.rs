//! Per-key list cache with TTL, request dedupe and rate-limit backoff.
//!
//! This module keeps one cache slot per entity key:
//! - Serves cached data while it is younger than the key's TTL
//! - Shares one in-flight request among concurrent callers
//! - Retries rate-limit and connectivity failures with capped exponential backoff
//! - Keeps the last good data when a refresh fails (stale-but-available)

mod coordinator;
mod entry;
mod error;

pub use coordinator::{CacheCoordinator, FetchResult, FetchSettings, ListSource};
pub use entry::CacheEntry;
pub use error::FetchError;
