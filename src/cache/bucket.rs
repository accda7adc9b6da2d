//! Cache bucket definitions and TTL policy
//!
//! The set of buckets is closed and known at compile time. Each bucket maps
//! to one subdirectory of the cache root and carries a single retention
//! policy; entries never store their own TTL.

use chrono::Duration;

/// The fixed set of cache buckets managed under the cache root.
///
/// Each variant corresponds to a subdirectory of the cache root with the
/// same name as returned by [`Bucket::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Fetched model documentation pages
    ModelDocs,
    /// Per-commit pull-request analysis results (filenames embed a commit id)
    PrAnalysis,
    /// Link reachability check results
    LinkValidation,
}

impl Bucket {
    /// All known buckets, in reporting order.
    pub const ALL: [Bucket; 3] = [Bucket::ModelDocs, Bucket::PrAnalysis, Bucket::LinkValidation];

    /// Returns the bucket's directory name under the cache root.
    pub fn name(self) -> &'static str {
        match self {
            Bucket::ModelDocs => "model-docs",
            Bucket::PrAnalysis => "pr-analysis",
            Bucket::LinkValidation => "link-validation",
        }
    }

    /// Looks up a bucket by its directory name.
    pub fn from_name(name: &str) -> Option<Bucket> {
        Bucket::ALL.into_iter().find(|b| b.name() == name)
    }
}

/// Per-bucket retention policy.
///
/// The table is given input: callers may override individual TTLs at
/// construction (e.g. from an external configuration layer), but the manager
/// itself never parses configuration. Unknown bucket names resolve to the
/// fallback TTL rather than failing.
#[derive(Debug, Clone)]
pub struct TtlTable {
    model_docs: Duration,
    pr_analysis: Duration,
    link_validation: Duration,
    fallback: Duration,
}

impl Default for TtlTable {
    fn default() -> Self {
        Self {
            model_docs: Duration::hours(24),
            pr_analysis: Duration::days(7),
            link_validation: Duration::hours(1),
            fallback: Duration::hours(24),
        }
    }
}

impl TtlTable {
    /// Returns the TTL configured for `bucket`.
    pub fn ttl(&self, bucket: Bucket) -> Duration {
        match bucket {
            Bucket::ModelDocs => self.model_docs,
            Bucket::PrAnalysis => self.pr_analysis,
            Bucket::LinkValidation => self.link_validation,
        }
    }

    /// Resolves a TTL by bucket name, falling back to the default for names
    /// outside the fixed set.
    pub fn ttl_for_name(&self, name: &str) -> Duration {
        match Bucket::from_name(name) {
            Some(bucket) => self.ttl(bucket),
            None => self.fallback,
        }
    }

    /// Overrides the TTL for one bucket.
    pub fn with_ttl(mut self, bucket: Bucket, ttl: Duration) -> Self {
        match bucket {
            Bucket::ModelDocs => self.model_docs = ttl,
            Bucket::PrAnalysis => self.pr_analysis = ttl,
            Bucket::LinkValidation => self.link_validation = ttl,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_buckets_are_distinct() {
        for (i, a) in Bucket::ALL.iter().enumerate() {
            for (j, b) in Bucket::ALL.iter().enumerate() {
                if i == j {
                    assert_eq!(a, b);
                } else {
                    assert_ne!(a, b);
                    assert_ne!(a.name(), b.name());
                }
            }
        }
    }

    #[test]
    fn test_from_name_round_trips() {
        for bucket in Bucket::ALL {
            assert_eq!(Bucket::from_name(bucket.name()), Some(bucket));
        }
        assert_eq!(Bucket::from_name("no-such-bucket"), None);
    }

    #[test]
    fn test_default_ttl_table() {
        let ttls = TtlTable::default();
        assert_eq!(ttls.ttl(Bucket::ModelDocs), Duration::hours(24));
        assert_eq!(ttls.ttl(Bucket::PrAnalysis), Duration::days(7));
        assert_eq!(ttls.ttl(Bucket::LinkValidation), Duration::hours(1));
    }

    #[test]
    fn test_unknown_bucket_name_falls_back_to_default() {
        let ttls = TtlTable::default();
        assert_eq!(ttls.ttl_for_name("no-such-bucket"), Duration::hours(24));
        assert_eq!(ttls.ttl_for_name(""), Duration::hours(24));
    }

    #[test]
    fn test_ttl_for_name_matches_known_buckets() {
        let ttls = TtlTable::default();
        assert_eq!(ttls.ttl_for_name("pr-analysis"), Duration::days(7));
        assert_eq!(ttls.ttl_for_name("link-validation"), Duration::hours(1));
    }

    #[test]
    fn test_with_ttl_overrides_one_bucket() {
        let ttls = TtlTable::default().with_ttl(Bucket::LinkValidation, Duration::minutes(5));
        assert_eq!(ttls.ttl(Bucket::LinkValidation), Duration::minutes(5));
        // Other buckets keep their defaults
        assert_eq!(ttls.ttl(Bucket::ModelDocs), Duration::hours(24));
    }
}
