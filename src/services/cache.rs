// src/services/cache.rs
// DOCUMENTATION: Simple in-memory cache for catalog and attraction responses
// PURPOSE: Avoid re-querying data that changes rarely (provinces, amenities)
// and re-calling the Google Places API for the same campsite.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

pub const PROVINCES_KEY: &str = "catalog:provinces";
pub const AMENITIES_KEY: &str = "catalog:amenities";

/// Cache entry with expiration
#[derive(Clone, Debug)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// In-memory cache with TTL
/// DOCUMENTATION: Thread-safe, values stored as serialized JSON
pub struct ResponseCache {
    store: Arc<RwLock<HashMap<String, CacheEntry<String>>>>,
    default_ttl: Duration,
}

impl ResponseCache {
    /// Create new cache with default TTL
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Key for attractions around a point, rounded to ~10m
    pub fn attractions_key(lat: f64, lng: f64, radius_km: f64) -> String {
        format!(
            "attractions:{}:{}:{}",
            (lat * 10000.0).round() as i64,
            (lng * 10000.0).round() as i64,
            (radius_km * 1000.0).round() as i64
        )
    }

    /// Get cached value
    pub async fn get(&self, key: &str) -> Option<String> {
        let store = self.store.read().await;

        if let Some(entry) = store.get(key) {
            if !entry.is_expired() {
                log::debug!("Cache HIT for key: {}", key);
                return Some(entry.data.clone());
            } else {
                log::debug!("Cache EXPIRED for key: {}", key);
            }
        } else {
            log::debug!("Cache MISS for key: {}", key);
        }

        None
    }

    /// Get and deserialize; undecodable entries count as a miss
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Set cached value with default TTL
    pub async fn set(&self, key: String, value: String) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Serialize and store with default TTL
    pub async fn set_json<T: Serialize>(&self, key: String, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(key, raw).await,
            Err(e) => log::warn!("Failed to serialize cache entry {}: {}", key, e),
        }
    }

    /// Set cached value with custom TTL
    pub async fn set_with_ttl(&self, key: String, value: String, ttl: Duration) {
        let mut store = self.store.write().await;
        store.insert(key.clone(), CacheEntry::new(value, ttl));
        log::debug!("Cache SET for key: {} (TTL: {}s)", key, ttl.as_secs());
    }

    /// Drop one entry, e.g. after a listing changes province counts
    pub async fn invalidate(&self, key: &str) {
        let mut store = self.store.write().await;
        if store.remove(key).is_some() {
            log::debug!("Cache INVALIDATE for key: {}", key);
        }
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let after_count = store.len();

        if before_count > after_count {
            log::info!(
                "Cache cleanup: removed {} expired entries ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        let total = store.len();
        let expired = store.values().filter(|e| e.is_expired()).count();

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }
}

/// Cache statistics
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired entries
pub fn start_cleanup_task(cache: Arc<ResponseCache>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_set_get() {
        let cache = ResponseCache::new(60);

        cache.set("key1".to_string(), "value1".to_string()).await;
        assert_eq!(cache.get("key1").await, Some("value1".to_string()));
        assert_eq!(cache.get("missing").await, None);
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache = ResponseCache::new(60);

        cache
            .set_with_ttl("key".to_string(), "v".to_string(), Duration::from_millis(50))
            .await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(cache.get("key").await.is_none());
        assert_eq!(cache.stats().await.expired_entries, 1);

        cache.cleanup().await;
        assert_eq!(cache.stats().await.total_entries, 0);
    }

    #[tokio::test]
    async fn test_json_round_trip_and_invalidate() {
        let cache = ResponseCache::new(60);
        cache.set_json(PROVINCES_KEY.to_string(), &vec!["krabi", "loei"]).await;

        let cached: Option<Vec<String>> = cache.get_json(PROVINCES_KEY).await;
        assert_eq!(cached, Some(vec!["krabi".to_string(), "loei".to_string()]));

        cache.invalidate(PROVINCES_KEY).await;
        assert!(cache.get(PROVINCES_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_get_json_type_mismatch_is_miss() {
        let cache = ResponseCache::new(60);
        cache.set("k".to_string(), "not json".to_string()).await;
        let value: Option<Vec<u32>> = cache.get_json("k").await;
        assert!(value.is_none());
    }

    #[test]
    fn test_attractions_key() {
        let key1 = ResponseCache::attractions_key(18.588, 98.487, 30.0);
        let key2 = ResponseCache::attractions_key(18.588, 98.487, 30.0);
        let key3 = ResponseCache::attractions_key(18.589, 98.487, 30.0);

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
    }
}
