use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

/// 按条目记录的过期时间
struct PerEntryTtl;

impl Expiry<String, (String, Duration)> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &(String, Duration),
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.1)
    }
}

pub struct MokaCacheWrapper {
    inner: Cache<String, (String, Duration)>,
    default_ttl: Duration,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_capacity(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_capacity(max_capacity: u64, default_ttl: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, default TTL: {}s",
            max_capacity, default_ttl
        );
        Self {
            inner,
            default_ttl: Duration::from_secs(default_ttl),
        }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some((value, _)) => CacheResult::Found(value),
            None => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = if ttl == 0 {
            self.default_ttl
        } else {
            Duration::from_secs(ttl)
        };
        self.inner.insert(key, (value, ttl)).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaCacheWrapper::with_capacity(16, 60);
        cache
            .insert_raw("auth:abc".to_string(), "{}".to_string(), 0)
            .await;
        assert_eq!(
            cache.get_raw("auth:abc").await,
            CacheResult::Found("{}".to_string())
        );

        cache.remove("auth:abc").await;
        assert_eq!(cache.get_raw("auth:abc").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_json_helpers_through_trait_object() {
        let cache: Box<dyn ObjectCache> = Box::new(MokaCacheWrapper::with_capacity(16, 60));
        cache.insert_json("n".to_string(), &vec![1, 2, 3], 10).await;
        assert_eq!(
            cache.get_json::<Vec<i32>>("n").await,
            CacheResult::Found(vec![1, 2, 3])
        );
        // 类型不符视为未命中
        assert_eq!(cache.get_json::<String>("n").await, CacheResult::NotFound);
    }
}
