use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::catalog::domain::catalog_entry::FrameCatalogEntry;
use crate::shared::constants::CATALOG_TTL_SECS;

/// Snapshot of a successful catalog fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogCache {
    /// Cache key of the source that produced the entries. Empty for caches
    /// written before sources were keyed; those never match.
    #[serde(default)]
    pub source: String,
    pub entries: Vec<FrameCatalogEntry>,
    pub fetched_at: SystemTime,
    pub ttl: Duration,
}

impl CatalogCache {
    pub fn new(
        source: impl Into<String>,
        entries: Vec<FrameCatalogEntry>,
        fetched_at: SystemTime,
        ttl: Duration,
    ) -> Self {
        Self {
            source: source.into(),
            entries,
            fetched_at,
            ttl,
        }
    }

    pub fn with_default_ttl(
        source: impl Into<String>,
        entries: Vec<FrameCatalogEntry>,
        fetched_at: SystemTime,
    ) -> Self {
        Self::new(source, entries, fetched_at, Duration::from_secs(CATALOG_TTL_SECS))
    }

    /// Fresh while `now - fetched_at < ttl`. A `fetched_at` in the future
    /// (clock moved backwards) counts as stale.
    pub fn is_fresh(&self, now: SystemTime) -> bool {
        match now.duration_since(self.fetched_at) {
            Ok(age) => age < self.ttl,
            Err(_) => false,
        }
    }

    /// Fresh at `now` and produced by the source keyed `source`.
    pub fn is_usable_for(&self, source: &str, now: SystemTime) -> bool {
        !self.source.is_empty() && self.source == source && self.is_fresh(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[rstest]
    #[case::just_fetched(1_000, true)]
    #[case::half_hour(2_800, true)]
    #[case::one_second_before_expiry(4_599, true)]
    #[case::exactly_at_ttl(4_600, false)]
    #[case::long_expired(100_000, false)]
    #[case::fetched_in_future(999, false)]
    fn test_freshness(#[case] now: u64, #[case] fresh: bool) {
        let cache = CatalogCache::with_default_ttl("shop", Vec::new(), at(1_000));
        assert_eq!(cache.is_fresh(at(now)), fresh);
    }

    #[test]
    fn test_zero_ttl_is_never_fresh() {
        let cache = CatalogCache::new("shop", Vec::new(), at(10), Duration::ZERO);
        assert!(!cache.is_fresh(at(10)));
    }

    #[test]
    fn test_cache_roundtrips_through_json() {
        let cache = CatalogCache::with_default_ttl("shop", Vec::new(), at(1_700_000_000));
        let json = serde_json::to_string(&cache).unwrap();
        let back: CatalogCache = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cache);
    }

    #[rstest]
    #[case::same_source("shop", 1_100, true)]
    #[case::other_source("other", 1_100, false)]
    #[case::same_source_expired("shop", 5_000, false)]
    fn test_usable_for(#[case] source: &str, #[case] now: u64, #[case] usable: bool) {
        let cache = CatalogCache::with_default_ttl("shop", Vec::new(), at(1_000));
        assert_eq!(cache.is_usable_for(source, at(now)), usable);
    }

    #[test]
    fn test_unkeyed_cache_file_is_never_usable() {
        let json = r#"{"entries": [], "fetched_at": {"secs_since_epoch": 1000, "nanos_since_epoch": 0}, "ttl": {"secs": 3600, "nanos": 0}}"#;
        let cache: CatalogCache = serde_json::from_str(json).unwrap();
        assert!(cache.source.is_empty());
        assert!(cache.is_fresh(at(1_100)));
        assert!(!cache.is_usable_for("", at(1_100)));
    }
}
