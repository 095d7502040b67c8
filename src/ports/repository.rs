use async_trait::async_trait;
use crate::domain::entities::MirroredRepository;
use crate::shared::result::Result;

/// 本地镜像仓储接口（Repository Pattern）
#[async_trait]
pub trait MirrorPort: Send + Sync {
    /// 根据 ID 查找仓库
    async fn find_by_id(&self, id: i64) -> Result<Option<MirroredRepository>>;

    /// 根据名称查找仓库
    async fn find_by_name(&self, name: &str) -> Result<Option<MirroredRepository>>;

    /// 按 ID 顺序列出所有仓库
    async fn list_all(&self) -> Result<Vec<MirroredRepository>>;

    /// 统计名称包含 `search` 的仓库数量（区分大小写，空串匹配全部）
    async fn count_matching(&self, search: &str) -> Result<u64>;

    /// 分页列出名称包含 `search` 的仓库
    async fn list_matching(
        &self,
        search: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<MirroredRepository>>;

    /// 插入新仓库，返回生成的 ID
    async fn insert(&self, repo: &MirroredRepository) -> Result<i64>;

    /// 更新名称和地址，返回是否有记录被修改
    async fn update(&self, id: i64, name: &str, url: &str) -> Result<bool>;

    /// 删除仓库，返回是否有记录被删除
    async fn delete(&self, id: i64) -> Result<bool>;
}
