//! Memoizing cache for the upstream asset list
//!
//! Provides an `AssetCache` that holds one snapshot of the full upstream list and
//! serves it until the freshness window elapses. Fetches are single-flight: callers
//! that miss while another fetch is in progress wait for it and share its result.

use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use super::{Clock, SystemClock};
use crate::data::{AssetRecord, AssetSource, FetchError};

/// The single cache slot
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<AssetRecord>,
    fetched_at: DateTime<Utc>,
}

/// Result of peeking at the cache, including metadata about freshness
#[derive(Debug, Clone)]
pub struct CachedData {
    /// The cached asset list
    pub data: Vec<AssetRecord>,
    /// When the list was fetched
    pub fetched_at: DateTime<Utc>,
    /// Whether the freshness window has elapsed
    pub is_expired: bool,
}

struct CacheInner {
    source: Arc<dyn AssetSource>,
    clock: Arc<dyn Clock>,
    window: Duration,
    fetch_limit: u32,
    entry: RwLock<Option<CacheEntry>>,
    /// Held for the duration of an upstream fetch
    fetch_lock: Mutex<()>,
    /// Bumped each time a fetch stores a new entry
    generation: AtomicU64,
}

/// Cache over an `AssetSource` with an explicit expiry clock
///
/// Cloning is cheap; clones share the same slot.
#[derive(Clone)]
pub struct AssetCache {
    inner: Arc<CacheInner>,
}

impl AssetCache {
    /// Creates a cache using wall-clock time
    pub fn new(source: Arc<dyn AssetSource>, window_secs: u64, fetch_limit: u32) -> Self {
        Self::with_clock(source, Arc::new(SystemClock), window_secs, fetch_limit)
    }

    /// Creates a cache with a custom clock
    pub fn with_clock(
        source: Arc<dyn AssetSource>,
        clock: Arc<dyn Clock>,
        window_secs: u64,
        fetch_limit: u32,
    ) -> Self {
        // chrono durations hold at most i64::MAX milliseconds
        let window_secs = window_secs.min(i64::MAX as u64 / 1000) as i64;
        Self {
            inner: Arc::new(CacheInner {
                source,
                clock,
                window: Duration::seconds(window_secs),
                fetch_limit,
                entry: RwLock::new(None),
                fetch_lock: Mutex::new(()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the cached list, fetching it first if missing or expired
    ///
    /// On fetch failure the previous entry (if any) is kept and the error is returned.
    pub async fn get(&self) -> Result<Vec<AssetRecord>, FetchError> {
        if let Some(data) = self.fresh_value() {
            log::debug!("Serving {} assets from cache", data.len());
            return Ok(data);
        }

        let _guard = self.inner.fetch_lock.lock().await;

        // Another caller may have filled the slot while we waited
        if let Some(data) = self.fresh_value() {
            return Ok(data);
        }

        self.fetch_and_store().await
    }

    /// Fetches a new list regardless of freshness and replaces the entry
    ///
    /// If a fetch completes while this call is waiting on the in-flight guard, its
    /// result is returned instead of issuing another request.
    pub async fn refresh(&self) -> Result<Vec<AssetRecord>, FetchError> {
        let seen = self.inner.generation.load(Ordering::Acquire);
        let _guard = self.inner.fetch_lock.lock().await;

        if self.inner.generation.load(Ordering::Acquire) != seen {
            if let Some(entry) = self.read_entry() {
                return Ok(entry.value);
            }
        }

        self.fetch_and_store().await
    }

    /// Stores `records` as a freshly fetched entry
    pub fn set(&self, records: Vec<AssetRecord>) {
        let entry = CacheEntry {
            value: records,
            fetched_at: self.inner.clock.now(),
        };
        *self.inner.entry.write().unwrap_or_else(|e| e.into_inner()) = Some(entry);
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Drops the current entry; the next `get` fetches
    pub fn invalidate(&self) {
        *self.inner.entry.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Reads the current entry without fetching
    pub fn peek(&self) -> Option<CachedData> {
        let entry = self.read_entry()?;
        let is_expired = !self.is_fresh(&entry);
        Some(CachedData {
            data: entry.value,
            fetched_at: entry.fetched_at,
            is_expired,
        })
    }

    fn read_entry(&self) -> Option<CacheEntry> {
        self.inner
            .entry
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        self.inner.clock.now() - entry.fetched_at <= self.inner.window
    }

    fn fresh_value(&self) -> Option<Vec<AssetRecord>> {
        self.read_entry()
            .filter(|entry| self.is_fresh(entry))
            .map(|entry| entry.value)
    }

    async fn fetch_and_store(&self) -> Result<Vec<AssetRecord>, FetchError> {
        let records = match self.inner.source.fetch_assets(self.inner.fetch_limit).await {
            Ok(records) => records,
            Err(err) => {
                log::error!("Asset fetch failed: {}", err);
                return Err(err);
            }
        };

        let malformed: Vec<&str> = records
            .iter()
            .filter(|record| !record.malformed_fields().is_empty())
            .map(|record| record.id.as_str())
            .collect();
        if !malformed.is_empty() {
            log::warn!(
                "{} assets have malformed numeric fields: {}",
                malformed.len(),
                malformed.join(", ")
            );
        }

        log::debug!("Fetched {} assets from upstream", records.len());
        self.set(records.clone());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::data::sample_record;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use std::time::Duration as StdDuration;

    /// Source that counts calls and can be switched into failure
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
        fail: AtomicBool,
        delay_ms: u64,
    }

    impl CountingSource {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AssetSource for CountingSource {
        async fn fetch_assets(&self, limit: u32) -> Result<Vec<AssetRecord>, FetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.delay_ms > 0 {
                tokio::time::sleep(StdDuration::from_millis(self.delay_ms)).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(FetchError::Upstream { status: 500 });
            }
            assert_eq!(limit, 100);
            Ok(vec![sample_record("bitcoin", "BTC", "Bitcoin", &call.to_string())])
        }
    }

    fn create_test_cache(source: Arc<CountingSource>) -> (AssetCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = AssetCache::with_clock(source, clock.clone(), 60, 100);
        (cache, clock)
    }

    #[tokio::test]
    async fn test_first_get_fetches() {
        let source = Arc::new(CountingSource::default());
        let (cache, _clock) = create_test_cache(source.clone());

        let data = cache.get().await.expect("Fetch should succeed");

        assert_eq!(data.len(), 1);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_get_within_window_uses_cache() {
        let source = Arc::new(CountingSource::default());
        let (cache, clock) = create_test_cache(source.clone());

        cache.get().await.unwrap();
        clock.advance_secs(59);
        let data = cache.get().await.unwrap();

        assert_eq!(source.calls(), 1);
        assert_eq!(data[0].rank, "1");
    }

    #[tokio::test]
    async fn test_get_at_window_boundary_is_fresh() {
        let source = Arc::new(CountingSource::default());
        let (cache, clock) = create_test_cache(source.clone());

        cache.get().await.unwrap();
        clock.advance_secs(60);
        cache.get().await.unwrap();

        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_get_after_window_refetches() {
        let source = Arc::new(CountingSource::default());
        let (cache, clock) = create_test_cache(source.clone());

        cache.get().await.unwrap();
        clock.advance_secs(61);
        let data = cache.get().await.unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(data[0].rank, "2");
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_entry() {
        let source = Arc::new(CountingSource::default());
        let (cache, clock) = create_test_cache(source.clone());

        cache.get().await.unwrap();
        clock.advance_secs(120);
        source.fail.store(true, Ordering::SeqCst);

        let result = cache.get().await;
        assert!(matches!(result, Err(FetchError::Upstream { status: 500 })));

        let peeked = cache.peek().expect("Previous entry should remain");
        assert_eq!(peeked.data[0].rank, "1");
        assert!(peeked.is_expired);
    }

    #[tokio::test]
    async fn test_failed_first_fetch_leaves_cache_empty() {
        let source = Arc::new(CountingSource::default());
        source.fail.store(true, Ordering::SeqCst);
        let (cache, _clock) = create_test_cache(source.clone());

        assert!(cache.get().await.is_err());
        assert!(cache.peek().is_none());
    }

    #[tokio::test]
    async fn test_refresh_bypasses_fresh_entry() {
        let source = Arc::new(CountingSource::default());
        let (cache, _clock) = create_test_cache(source.clone());

        cache.get().await.unwrap();
        let data = cache.refresh().await.unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(data[0].rank, "2");
        assert_eq!(cache.get().await.unwrap()[0].rank, "2");
    }

    #[tokio::test]
    async fn test_invalidate_forces_fetch() {
        let source = Arc::new(CountingSource::default());
        let (cache, _clock) = create_test_cache(source.clone());

        cache.get().await.unwrap();
        cache.invalidate();
        assert!(cache.peek().is_none());

        cache.get().await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_set_populates_without_fetch() {
        let source = Arc::new(CountingSource::default());
        let (cache, _clock) = create_test_cache(source.clone());

        cache.set(vec![sample_record("solana", "SOL", "Solana", "5")]);
        let data = cache.get().await.unwrap();

        assert_eq!(source.calls(), 0);
        assert_eq!(data[0].id, "solana");
    }

    #[tokio::test]
    async fn test_concurrent_gets_share_one_fetch() {
        let source = Arc::new(CountingSource {
            delay_ms: 50,
            ..Default::default()
        });
        let (cache, _clock) = create_test_cache(source.clone());

        let (a, b, c) = tokio::join!(cache.get(), cache.get(), cache.get());

        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_share_one_fetch() {
        let source = Arc::new(CountingSource {
            delay_ms: 50,
            ..Default::default()
        });
        let (cache, _clock) = create_test_cache(source.clone());

        let (a, b) = tokio::join!(cache.refresh(), cache.refresh());

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(source.calls(), 1);
    }
}
