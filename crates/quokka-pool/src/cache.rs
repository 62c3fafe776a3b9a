//! Time-bounded in-memory cache
//!
//! Entries carry their own expiry and are pruned lazily: reading an expired
//! entry removes it and reports absence. `purge_expired` and the background
//! sweeper cover keys that are never read again. There is no capacity bound
//! and no LRU policy.

use crate::error::{PoolError, Result};
use quokka_constants::POOL_CACHE_TTL_SECS;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Cache entry with expiry
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Live and not yet pruned entries
    pub keys: usize,
}

/// Process-local key/value store with per-entry TTL
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    default_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(Duration::from_secs(POOL_CACHE_TTL_SECS))
    }
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache whose `insert` uses `default_ttl`
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Get a live value, removing it if it has expired
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    trace!(key, "Cache hit");
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        }

        // Expired: re-check under the write lock, a concurrent set may have refreshed it
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if !entry.is_expired(Instant::now()) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
            entries.remove(key);
            debug!(key, "Evicted expired cache entry");
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Like [`get`](Self::get) but reports absence as `PoolError::CacheMiss`
    pub async fn lookup(&self, key: &str) -> Result<V> {
        self.get(key)
            .await
            .ok_or_else(|| PoolError::cache_miss(key))
    }

    /// Store a value for `ttl`, overwriting any previous entry
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        debug!(key = %key, ttl_secs = ttl.as_secs(), "Caching value");
        self.entries
            .write()
            .await
            .insert(key, CacheEntry::new(value, ttl));
    }

    /// Store a value for the default TTL
    pub async fn insert(&self, key: impl Into<String>, value: V) {
        self.set(key, value, self.default_ttl).await;
    }

    /// Check for a live entry without extending its life or touching counters
    pub async fn has(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Evict a key, returning the value if it was still live
    pub async fn remove(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        self.entries
            .write()
            .await
            .remove(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value)
    }

    /// Drop every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, remaining = entries.len(), "Purged expired cache entries");
        }
        purged
    }

    /// Number of stored entries, expired ones included until pruned
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Remove all entries
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            keys: self.len().await,
        }
    }
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Periodically purge expired entries in the background
    ///
    /// The task holds only a weak reference and exits once the last
    /// `Arc` to the cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match cache.upgrade() {
                    Some(cache) => {
                        cache.purge_expired().await;
                    }
                    None => {
                        debug!("Cache dropped, stopping sweeper");
                        break;
                    }
                }
            }
        })
    }
}
