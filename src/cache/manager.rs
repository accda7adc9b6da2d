//! Cache lifecycle manager for the on-disk TTL buckets
//!
//! Provides a `CacheManager` that enforces age-based expiration and offers
//! administration over a fixed set of bucket directories. There is no
//! persistent index: every operation re-derives entry ages and sizes from the
//! filesystem at call time, so a single invocation is always consistent with
//! what is actually on disk.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::bucket::{Bucket, TtlTable};
use super::stats::{BucketListing, BucketStats, CacheStats, EntryInfo};

/// Error types for cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// The bucket directory required by the operation does not exist
    #[error("cache bucket '{bucket}' does not exist at {}", path.display())]
    BucketMissing {
        /// Name of the missing bucket
        bucket: &'static str,
        /// Expected directory path
        path: PathBuf,
    },

    /// An underlying filesystem operation failed
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// Path the operation was touching
        path: PathBuf,
        /// The underlying I/O error
        source: io::Error,
    },
}

impl CacheError {
    fn io(path: &Path, source: io::Error) -> Self {
        CacheError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Removed-entry count for one bucket
#[derive(Debug, Clone, Serialize)]
pub struct BucketCount {
    /// Bucket directory name
    pub bucket: &'static str,
    /// Number of entries removed
    pub removed: usize,
}

/// Result of a clean pass over every bucket
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    /// Per-bucket removed counts, in bucket order
    pub buckets: Vec<BucketCount>,
    /// Total entries removed across all buckets
    pub total_removed: usize,
}

/// Result of clearing every bucket
#[derive(Debug, Clone, Serialize)]
pub struct ClearReport {
    /// Per-bucket removed counts, in bucket order
    pub buckets: Vec<BucketCount>,
    /// Total entries removed across all buckets
    pub total_removed: usize,
}

/// Result of a targeted invalidation in the pr-analysis bucket
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateReport {
    /// Bucket the invalidation ran against
    pub bucket: &'static str,
    /// The substring that was matched against entry filenames
    pub key: String,
    /// Number of matching entries removed
    pub removed: usize,
}

/// Metadata for one on-disk entry, gathered during a directory scan
struct EntryMeta {
    path: PathBuf,
    name: String,
    len: u64,
    modified: DateTime<Utc>,
}

/// Manages TTL expiration and administration over the cache buckets
///
/// The manager is stateless and synchronous: each operation is a single pass
/// over one or more bucket directories with no locking. Concurrent external
/// writers may race with a running operation; cache entries are regenerable,
/// so lost races are harmless.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory containing the bucket subdirectories
    root: PathBuf,
    /// Retention policy per bucket
    ttls: TtlTable,
}

impl CacheManager {
    /// Creates a manager over `root` with the default TTL table.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ttls: TtlTable::default(),
        }
    }

    /// Creates a manager with an externally supplied TTL table.
    pub fn with_ttls(root: PathBuf, ttls: TtlTable) -> Self {
        Self { root, ttls }
    }

    /// Returns the cache root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory path for a bucket.
    fn bucket_dir(&self, bucket: Bucket) -> PathBuf {
        self.root.join(bucket.name())
    }

    /// Scans a bucket directory, non-recursive, files only.
    ///
    /// Returns `None` when the directory does not exist. Entries are sorted
    /// by name so reports are deterministic.
    fn scan(&self, bucket: Bucket) -> Result<Option<Vec<EntryMeta>>, CacheError> {
        let dir = self.bucket_dir(bucket);
        let read_dir = match fs::read_dir(&dir) {
            Ok(read_dir) => read_dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(CacheError::io(&dir, err)),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| CacheError::io(&dir, e))?;
            let path = entry.path();
            let metadata = entry.metadata().map_err(|e| CacheError::io(&path, e))?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata
                .modified()
                .map_err(|e| CacheError::io(&path, e))?
                .into();
            entries.push(EntryMeta {
                name: entry.file_name().to_string_lossy().into_owned(),
                len: metadata.len(),
                modified,
                path,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Some(entries))
    }

    /// Removes expired entries from every bucket.
    ///
    /// An entry is expired when its age (now minus mtime) strictly exceeds
    /// the bucket's TTL; an entry exactly at the boundary is kept. Buckets
    /// whose directory does not exist are reported with a zero count.
    ///
    /// # Returns
    /// * `Ok(CleanReport)` with per-bucket and total removed counts
    /// * `Err(CacheError)` if a scan fails or a deletion fails; deletions are
    ///   best-effort, so entries removed before the error stay removed
    pub fn clean(&self) -> Result<CleanReport, CacheError> {
        self.clean_at(Utc::now())
    }

    fn clean_at(&self, now: DateTime<Utc>) -> Result<CleanReport, CacheError> {
        let mut buckets = Vec::new();
        let mut total_removed = 0;

        for bucket in Bucket::ALL {
            let removed = match self.scan(bucket)? {
                Some(entries) => {
                    let ttl = self.ttls.ttl(bucket);
                    let expired = entries
                        .iter()
                        .filter(|e| now.signed_duration_since(e.modified) > ttl);
                    self.remove_entries(expired)?
                }
                None => {
                    debug!(bucket = bucket.name(), "bucket directory missing, skipping");
                    0
                }
            };
            total_removed += removed;
            buckets.push(BucketCount {
                bucket: bucket.name(),
                removed,
            });
        }

        Ok(CleanReport {
            buckets,
            total_removed,
        })
    }

    /// Removes every entry from every bucket, regardless of age, and leaves
    /// an empty directory behind for each bucket.
    ///
    /// Unconditional: there is no confirmation step or dry-run. Buckets whose
    /// directory did not exist are created empty.
    pub fn clear(&self) -> Result<ClearReport, CacheError> {
        let mut buckets = Vec::new();
        let mut total_removed = 0;

        for bucket in Bucket::ALL {
            let dir = self.bucket_dir(bucket);
            let removed = match self.scan(bucket)? {
                Some(entries) => {
                    fs::remove_dir_all(&dir).map_err(|e| CacheError::io(&dir, e))?;
                    entries.len()
                }
                None => 0,
            };
            fs::create_dir_all(&dir).map_err(|e| CacheError::io(&dir, e))?;
            total_removed += removed;
            buckets.push(BucketCount {
                bucket: bucket.name(),
                removed,
            });
        }

        Ok(ClearReport {
            buckets,
            total_removed,
        })
    }

    /// Reports entry counts, sizes, TTLs, and oldest-entry ages.
    ///
    /// Only buckets whose directory exists appear in the report. Purely
    /// read-only.
    pub fn stats(&self) -> Result<CacheStats, CacheError> {
        self.stats_at(Utc::now())
    }

    fn stats_at(&self, now: DateTime<Utc>) -> Result<CacheStats, CacheError> {
        let mut buckets = Vec::new();
        let mut total_entries = 0;
        let mut total_size_bytes = 0;

        for bucket in Bucket::ALL {
            let Some(entries) = self.scan(bucket)? else {
                continue;
            };
            let size_bytes: u64 = entries.iter().map(|e| e.len).sum();
            let oldest_age_secs = entries
                .iter()
                .map(|e| e.modified)
                .min()
                .map(|oldest| now.signed_duration_since(oldest).num_seconds().max(0));
            total_entries += entries.len();
            total_size_bytes += size_bytes;
            buckets.push(BucketStats {
                bucket: bucket.name(),
                entries: entries.len(),
                size_bytes,
                ttl_secs: self.ttls.ttl(bucket).num_seconds(),
                oldest_age_secs,
            });
        }

        Ok(CacheStats {
            buckets,
            total_entries,
            total_size_bytes,
        })
    }

    /// Lists every entry in every existing bucket with its size and age,
    /// sorted by name.
    pub fn list(&self) -> Result<Vec<BucketListing>, CacheError> {
        self.list_at(Utc::now())
    }

    fn list_at(&self, now: DateTime<Utc>) -> Result<Vec<BucketListing>, CacheError> {
        let mut listings = Vec::new();
        for bucket in Bucket::ALL {
            let Some(entries) = self.scan(bucket)? else {
                continue;
            };
            listings.push(BucketListing {
                bucket: bucket.name(),
                entries: entries
                    .iter()
                    .map(|e| EntryInfo {
                        name: e.name.clone(),
                        size_bytes: e.len,
                        age_secs: now.signed_duration_since(e.modified).num_seconds().max(0),
                    })
                    .collect(),
            });
        }
        Ok(listings)
    }

    /// Removes every pr-analysis entry whose filename contains `key`.
    ///
    /// Invalidation is restricted to the pr-analysis bucket because its key
    /// scheme embeds a commit identifier in the filename; `key` matches as a
    /// substring anywhere in the name, so one key can remove several entries.
    ///
    /// # Returns
    /// * `Ok(InvalidateReport)` with the removed count (zero matches is fine)
    /// * `Err(CacheError::BucketMissing)` if the bucket directory does not exist
    pub fn invalidate(&self, key: &str) -> Result<InvalidateReport, CacheError> {
        let bucket = Bucket::PrAnalysis;
        let entries = self
            .scan(bucket)?
            .ok_or_else(|| CacheError::BucketMissing {
                bucket: bucket.name(),
                path: self.bucket_dir(bucket),
            })?;

        let matching = entries.iter().filter(|e| e.name.contains(key));
        let removed = self.remove_entries(matching)?;
        debug!(bucket = bucket.name(), key, removed, "invalidated entries");

        Ok(InvalidateReport {
            bucket: bucket.name(),
            key: key.to_string(),
            removed,
        })
    }

    /// Best-effort deletion over a set of entries.
    ///
    /// Keeps deleting past individual failures and propagates the last error
    /// encountered; deletions are not transactional.
    fn remove_entries<'a, I>(&self, entries: I) -> Result<usize, CacheError>
    where
        I: Iterator<Item = &'a EntryMeta>,
    {
        let mut removed = 0;
        let mut last_err = None;
        for entry in entries {
            match fs::remove_file(&entry.path) {
                Ok(()) => removed += 1,
                Err(err) => last_err = Some(CacheError::io(&entry.path, err)),
            }
        }
        match last_err {
            Some(err) => Err(err),
            None => Ok(removed),
        }
    }
}
