use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use crate::ports::cache::CachePort;

/// Moka 内存缓存实现，条目在 TTL 后自动失效
pub struct MokaCache {
    cache: Cache<String, ()>,
}

impl MokaCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl CachePort for MokaCache {
    async fn insert(&self, key: &str) {
        self.cache.insert(key.to_string(), ()).await;
    }

    async fn take(&self, key: &str) -> bool {
        // get() 会过滤已过期的条目，remove() 保证只有一个调用方拿到
        if self.cache.get(key).await.is_none() {
            return false;
        }
        self.cache.remove(key).await.is_some()
    }
}
