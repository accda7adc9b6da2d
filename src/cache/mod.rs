//! TTL cache management over the on-disk bucket directories
//!
//! This module owns the cache lifecycle: a fixed set of named buckets, each
//! with its own retention policy, and the clean/clear/stats/list/invalidate
//! operations over them. The filesystem is the only state store; nothing is
//! indexed or cached in memory between invocations.

mod bucket;
mod manager;
mod stats;

pub use bucket::{Bucket, TtlTable};
pub use manager::{
    BucketCount, CacheError, CacheManager, CleanReport, ClearReport, InvalidateReport,
};
pub use stats::{BucketListing, BucketStats, CacheStats, EntryInfo};
