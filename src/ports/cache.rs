use async_trait::async_trait;

/// 一次性 key 缓存接口，用于 OAuth state
#[async_trait]
pub trait CachePort: Send + Sync {
    /// 写入 key
    async fn insert(&self, key: &str);

    /// 取出并删除 key，key 存在且未过期时返回 true
    async fn take(&self, key: &str) -> bool;
}
