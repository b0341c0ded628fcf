//! The two TTL caches the Signing Engine maintains, keyed by
//! lowercase-hex sighash without a `0x` prefix.

use moka::future::Cache;
use std::time::Duration;

const SIG_CACHE_TTL: Duration = Duration::from_secs(24 * 3600);
const SIG_CACHE_CAPACITY: u64 = 100_000;
const TIME_CACHE_TTL: Duration = Duration::from_secs(24 * 3600);
const TIME_CACHE_CAPACITY: u64 = 200_000;

/// sighash-hex -> signature bytes.
#[derive(Clone)]
pub struct SigCache(Cache<String, Vec<u8>>);

impl SigCache {
    pub fn new() -> Self {
        SigCache(
            Cache::builder()
                .max_capacity(SIG_CACHE_CAPACITY)
                .time_to_live(SIG_CACHE_TTL)
                .build(),
        )
    }

    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.0.get(key).await
    }

    pub async fn insert(&self, key: String, sig: Vec<u8>) {
        self.0.insert(key, sig).await;
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.0.get(key).await.is_some()
    }
}

impl Default for SigCache {
    fn default() -> Self {
        Self::new()
    }
}

/// sighash-hex -> Unix-second timestamp at which the signature becomes
/// publicly releasable.
#[derive(Clone)]
pub struct TimeCache(Cache<String, u64>);

impl TimeCache {
    pub fn new() -> Self {
        TimeCache(
            Cache::builder()
                .max_capacity(TIME_CACHE_CAPACITY)
                .time_to_live(TIME_CACHE_TTL)
                .build(),
        )
    }

    pub async fn get(&self, key: &str) -> Option<u64> {
        self.0.get(key).await
    }

    pub async fn insert(&self, key: String, release_at: u64) {
        self.0.insert(key, release_at).await;
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.0.get(key).await.is_some()
    }
}

impl Default for TimeCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sig_cache_roundtrip() {
        let cache = SigCache::new();
        assert!(cache.get("aa").await.is_none());
        cache.insert("aa".into(), vec![1, 2, 3]).await;
        assert_eq!(cache.get("aa").await, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn time_cache_roundtrip() {
        let cache = TimeCache::new();
        cache.insert("aa".into(), 12345).await;
        assert_eq!(cache.get("aa").await, Some(12345));
        assert!(!cache.contains("bb").await);
    }
}
