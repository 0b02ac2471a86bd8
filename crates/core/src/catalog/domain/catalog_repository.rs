//! Catalog access with an injected time-to-live cache.
//!
//! A fresh cache written for the same source is served without touching the
//! source, truncated to the requested count. Otherwise the source is queried; success replaces the cache, failure yields the static
//! fallback list and leaves the cache as it was.

use std::time::{Duration, SystemTime};

use crate::catalog::domain::catalog_cache::CatalogCache;
use crate::catalog::domain::catalog_entry::FrameCatalogEntry;
use crate::catalog::domain::catalog_source::{CatalogError, CatalogSource};
use crate::shared::constants::{CATALOG_PAGE_SIZE, CATALOG_TTL_SECS};
use crate::shared::outcome::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    Cache,
    Remote,
    StaticFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFrames {
    pub entries: Vec<FrameCatalogEntry>,
    pub origin: CatalogOrigin,
}

pub struct CatalogRepository {
    source: Box<dyn CatalogSource>,
    fallback: Vec<FrameCatalogEntry>,
    cache: Option<CatalogCache>,
    ttl: Duration,
    max_count: usize,
}

impl CatalogRepository {
    pub fn new(source: Box<dyn CatalogSource>, fallback: Vec<FrameCatalogEntry>) -> Self {
        Self {
            source,
            fallback,
            cache: None,
            ttl: Duration::from_secs(CATALOG_TTL_SECS),
            max_count: CATALOG_PAGE_SIZE,
        }
    }

    pub fn with_cache(mut self, cache: Option<CatalogCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = max_count;
        self
    }

    pub fn cache(&self) -> Option<&CatalogCache> {
        self.cache.as_ref()
    }

    pub fn into_cache(self) -> Option<CatalogCache> {
        self.cache
    }

    /// Current catalog: cached if fresh at `now` and written for this
    /// source, otherwise fetched.
    pub fn frames(&mut self, now: SystemTime) -> Outcome<CatalogFrames, CatalogError> {
        let key = self.source.cache_key();
        match self.cache.as_ref() {
            Some(cache) if cache.is_usable_for(&key, now) => {
                let entries: Vec<_> = cache.entries.iter().take(self.max_count).cloned().collect();
                log::debug!("Serving {} catalog entries from cache", entries.len());
                return Outcome::Fetched(CatalogFrames {
                    entries,
                    origin: CatalogOrigin::Cache,
                });
            }
            Some(cache) if cache.source != key => {
                log::debug!("Ignoring catalog cache from {:?}", cache.source);
            }
            _ => {}
        }
        self.refresh(now)
    }

    /// Fetches regardless of cache freshness.
    pub fn refresh(&mut self, now: SystemTime) -> Outcome<CatalogFrames, CatalogError> {
        match self.source.list_available_frames(self.max_count) {
            Ok(mut entries) => {
                entries.truncate(self.max_count);
                log::info!("Fetched {} frames from the store", entries.len());
                self.cache = Some(CatalogCache::new(
                    self.source.cache_key(),
                    entries.clone(),
                    now,
                    self.ttl,
                ));
                Outcome::Fetched(CatalogFrames {
                    entries,
                    origin: CatalogOrigin::Remote,
                })
            }
            Err(cause) => {
                log::warn!("Catalog unavailable, using static list: {cause}");
                let mut entries = self.fallback.clone();
                entries.truncate(self.max_count);
                Outcome::Fallback {
                    value: CatalogFrames {
                        entries,
                        origin: CatalogOrigin::StaticFallback,
                    },
                    cause,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::domain::face_shape::FrameStyle;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const STORE: &str = "https://shop/products";

    struct StubSource {
        key: &'static str,
        entries: Option<Vec<FrameCatalogEntry>>,
        calls: Arc<AtomicUsize>,
    }

    impl CatalogSource for StubSource {
        fn list_available_frames(
            &self,
            max_count: usize,
        ) -> Result<Vec<FrameCatalogEntry>, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.entries {
                Some(entries) => Ok(entries.iter().take(max_count).cloned().collect()),
                None => Err(CatalogError::MissingCredentials),
            }
        }

        fn cache_key(&self) -> String {
            self.key.to_string()
        }
    }

    fn entry(name: &str) -> FrameCatalogEntry {
        FrameCatalogEntry::new(name, "", "100", "https://shop", FrameStyle::Ovaal)
    }

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn repository(entries: Option<Vec<FrameCatalogEntry>>) -> (CatalogRepository, Arc<AtomicUsize>) {
        repository_for(STORE, entries)
    }

    fn repository_for(
        key: &'static str,
        entries: Option<Vec<FrameCatalogEntry>>,
    ) -> (CatalogRepository, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = StubSource {
            key,
            entries,
            calls: Arc::clone(&calls),
        };
        let repo = CatalogRepository::new(Box::new(source), vec![entry("Fallback")]);
        (repo, calls)
    }

    #[test]
    fn test_fetch_populates_cache() {
        let (mut repo, calls) = repository(Some(vec![entry("A"), entry("B")]));
        let outcome = repo.frames(at(1_000));

        assert!(!outcome.is_fallback());
        assert_eq!(outcome.value().origin, CatalogOrigin::Remote);
        assert_eq!(outcome.value().entries.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(repo.cache().unwrap().fetched_at, at(1_000));
    }

    #[test]
    fn test_fresh_cache_skips_source() {
        let (mut repo, calls) = repository(Some(vec![entry("A")]));
        repo.frames(at(1_000));
        let outcome = repo.frames(at(1_000 + 3_599));

        assert_eq!(outcome.value().origin, CatalogOrigin::Cache);
        assert_eq!(outcome.value().entries[0].name, "A");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stale_cache_refetches() {
        let (mut repo, calls) = repository(Some(vec![entry("A")]));
        repo.frames(at(1_000));
        let outcome = repo.frames(at(1_000 + 3_600));

        assert_eq!(outcome.value().origin, CatalogOrigin::Remote);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(repo.cache().unwrap().fetched_at, at(4_600));
    }

    #[test]
    fn test_refresh_ignores_fresh_cache() {
        let (mut repo, calls) = repository(Some(vec![entry("A")]));
        repo.frames(at(1_000));
        let outcome = repo.refresh(at(1_001));

        assert_eq!(outcome.value().origin, CatalogOrigin::Remote);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failure_yields_fallback_and_is_not_cached() {
        let (mut repo, calls) = repository(None);
        let first = repo.frames(at(1_000));

        assert!(first.is_fallback());
        assert!(matches!(first.cause(), Some(CatalogError::MissingCredentials)));
        assert_eq!(first.value().origin, CatalogOrigin::StaticFallback);
        assert_eq!(first.value().entries[0].name, "Fallback");
        assert!(repo.cache().is_none());

        repo.frames(at(1_001));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failure_keeps_stale_cache_for_later() {
        let stale = CatalogCache::with_default_ttl(STORE, vec![entry("Old")], at(0));
        let (repo, _) = repository(None);
        let mut repo = repo.with_cache(Some(stale.clone()));

        let outcome = repo.frames(at(10_000));
        assert!(outcome.is_fallback());
        assert_eq!(repo.cache(), Some(&stale));
    }

    #[test]
    fn test_injected_fresh_cache_is_served() {
        let cached = CatalogCache::with_default_ttl(STORE, vec![entry("Cached")], at(500));
        let (repo, calls) = repository(Some(vec![entry("Remote")]));
        let mut repo = repo.with_cache(Some(cached));

        let outcome = repo.frames(at(600));
        assert_eq!(outcome.value().entries[0].name, "Cached");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fresh_cache_from_other_source_is_refetched() {
        let cached = CatalogCache::with_default_ttl(
            "https://other-shop/products",
            vec![entry("Other-1"), entry("Other-2")],
            at(500),
        );
        let (repo, calls) = repository(Some(vec![entry("Remote")]));
        let mut repo = repo.with_cache(Some(cached));

        let outcome = repo.frames(at(505));
        assert_eq!(outcome.value().origin, CatalogOrigin::Remote);
        assert_eq!(outcome.value().entries[0].name, "Remote");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(repo.cache().unwrap().source, STORE);
    }

    #[test]
    fn test_fresh_cache_is_truncated_to_max_count() {
        let cached = CatalogCache::with_default_ttl(
            STORE,
            vec![entry("A"), entry("B"), entry("C")],
            at(500),
        );
        let (repo, calls) = repository(Some(Vec::new()));
        let mut repo = repo.with_cache(Some(cached)).with_max_count(1);

        let outcome = repo.frames(at(505));
        assert_eq!(outcome.value().origin, CatalogOrigin::Cache);
        let names: Vec<_> = outcome.value().entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cache_written_for_other_page_size_is_refetched() {
        let (mut first, _) = repository_for("https://a/products?per_page=10", Some(vec![entry("A")]));
        first.frames(at(0));
        let written = first.into_cache();
        assert_eq!(written.as_ref().unwrap().source, "https://a/products?per_page=10");

        let (second, calls) = repository_for("https://a/products?per_page=5", Some(vec![entry("B")]));
        let mut second = second.with_cache(written);
        let outcome = second.frames(at(1));
        assert_eq!(outcome.value().origin, CatalogOrigin::Remote);
        assert_eq!(outcome.value().entries[0].name, "B");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_success_is_cached() {
        let (mut repo, calls) = repository(Some(Vec::new()));
        let first = repo.frames(at(1_000));
        assert!(!first.is_fallback());
        assert!(first.value().entries.is_empty());

        let second = repo.frames(at(1_001));
        assert_eq!(second.value().origin, CatalogOrigin::Cache);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_max_count_truncates_remote_and_fallback() {
        let (repo, _) = repository(Some(vec![entry("A"), entry("B"), entry("C")]));
        let mut repo = repo.with_max_count(2);
        assert_eq!(repo.frames(at(0)).value().entries.len(), 2);

        let (repo, _) = repository(None);
        let mut repo = repo.with_max_count(0);
        assert!(repo.frames(at(0)).value().entries.is_empty());
    }

    #[test]
    fn test_custom_ttl() {
        let (repo, calls) = repository(Some(vec![entry("A")]));
        let mut repo = repo.with_ttl(Duration::from_secs(10));
        repo.frames(at(0));
        repo.frames(at(9));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        repo.frames(at(10));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(repo.into_cache().unwrap().ttl, Duration::from_secs(10));
    }
}
