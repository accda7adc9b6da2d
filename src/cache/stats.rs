//! Serializable report types for the read-only cache operations
//!
//! Sizes are exact byte counts and ages/TTLs are whole seconds; rendering
//! them human-readable is left to the output layer.

use serde::Serialize;

/// Statistics for a single bucket whose directory exists.
#[derive(Debug, Clone, Serialize)]
pub struct BucketStats {
    /// Bucket directory name
    pub bucket: &'static str,
    /// Number of entries currently on disk
    pub entries: usize,
    /// Aggregate size of all entries in bytes
    pub size_bytes: u64,
    /// Configured TTL in seconds
    pub ttl_secs: i64,
    /// Age of the oldest entry in seconds, if the bucket is non-empty
    pub oldest_age_secs: Option<i64>,
}

/// Statistics across the whole cache root.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Per-bucket statistics, for buckets whose directory exists
    pub buckets: Vec<BucketStats>,
    /// Total entry count across all buckets
    pub total_entries: usize,
    /// Total size in bytes across all buckets
    pub total_size_bytes: u64,
}

/// A single entry as reported by the list operation.
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    /// Entry key (its filename)
    pub name: String,
    /// Size in bytes
    pub size_bytes: u64,
    /// Age in seconds, derived from the file's mtime
    pub age_secs: i64,
}

/// Listing of one bucket's entries, sorted by name.
#[derive(Debug, Clone, Serialize)]
pub struct BucketListing {
    /// Bucket directory name
    pub bucket: &'static str,
    /// Entries currently on disk
    pub entries: Vec<EntryInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_serializes_exact_sizes() {
        let stats = CacheStats {
            buckets: vec![BucketStats {
                bucket: "model-docs",
                entries: 3,
                size_bytes: 60,
                ttl_secs: 86_400,
                oldest_age_secs: Some(7_200),
            }],
            total_entries: 3,
            total_size_bytes: 60,
        };

        let json = serde_json::to_value(&stats).expect("Should serialize");
        assert_eq!(json["total_size_bytes"], 60);
        assert_eq!(json["buckets"][0]["bucket"], "model-docs");
        assert_eq!(json["buckets"][0]["oldest_age_secs"], 7_200);
    }

    #[test]
    fn test_empty_bucket_has_no_oldest_age() {
        let stats = BucketStats {
            bucket: "link-validation",
            entries: 0,
            size_bytes: 0,
            ttl_secs: 3_600,
            oldest_age_secs: None,
        };

        let json = serde_json::to_value(&stats).expect("Should serialize");
        assert!(json["oldest_age_secs"].is_null());
    }
}
