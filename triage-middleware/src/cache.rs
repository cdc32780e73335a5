//! Keyed response cache with TTL and a bounded entry count.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use lru::LruCache;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tokio::time::Instant;
use triage_types::{CacheConfig, TaskType};

/// Deterministic identity of a generation request.
///
/// Truncated SHA-256 over the task type, the whitespace-normalized prompt,
/// and the auxiliary parameters in key order. 128 bits is ample for a cache
/// key; this is a collision-tolerance concern, not a security boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 16]);

impl CacheKey {
    /// Compute the key for a request.
    ///
    /// The prompt is normalized (trimmed, internal whitespace runs collapsed
    /// to single spaces) so cosmetic formatting differences still collide;
    /// auxiliary parameters contribute in sorted key order, with field
    /// separators so adjacent values cannot alias each other.
    #[must_use]
    pub fn compute(task: TaskType, prompt: &str, aux: &BTreeMap<String, String>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(task.as_str().as_bytes());
        hasher.update([0u8]);
        let mut first = true;
        for word in prompt.split_whitespace() {
            if !first {
                hasher.update(b" ");
            }
            hasher.update(word.as_bytes());
            first = false;
        }
        hasher.update([0u8]);
        for (k, v) in aux {
            hasher.update(k.as_bytes());
            hasher.update([0u8]);
            hasher.update(v.as_bytes());
            hasher.update([0u8]);
        }
        let digest = hasher.finalize();
        let mut out = [0u8; 16];
        out.copy_from_slice(&digest[..16]);
        Self(out)
    }

    /// Hex rendering for logs and diagnostics.
    #[must_use]
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

struct Entry {
    value: String,
    stored_at: Instant,
}

/// Bounded TTL cache for provider responses.
///
/// Reads never refresh recency, so the underlying LRU order is insertion
/// order and eviction at capacity always removes the entry with the oldest
/// `stored_at`. An entry at exactly TTL age is already expired; expired
/// entries are removed lazily on access. Concurrent writers of the same key
/// are last-write-wins.
pub struct ResponseCache {
    ttl: Duration,
    inner: Mutex<LruCache<CacheKey, Entry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    /// Create a cache with the given lifetime and bound.
    #[must_use]
    pub fn new(cfg: &CacheConfig) -> Self {
        // Avoid zero capacity panics
        let cap = cfg.max_entries.max(1);
        let cap_nz = NonZeroUsize::new(cap).unwrap();
        Self {
            ttl: cfg.ttl,
            inner: Mutex::new(LruCache::new(cap_nz)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Fetch a live entry, removing it if it has expired.
    ///
    /// An expired entry counts as a miss.
    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        let mut guard = self.inner.lock().await;
        let hit = guard
            .peek(key)
            .map(|e| (Instant::now().duration_since(e.stored_at) < self.ttl, e.value.clone()));
        match hit {
            Some((true, value)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            Some((false, _)) => {
                guard.pop(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Lifetime hit/miss counters, in that order. Not reset by
    /// [`clear`](Self::clear).
    pub fn hit_miss_counts(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    /// Insert or replace an entry, evicting the oldest one at capacity.
    pub async fn put(&self, key: CacheKey, value: String) {
        let mut guard = self.inner.lock().await;
        guard.put(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Entries currently held, including any not-yet-collected expired ones.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// True when the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }
}
