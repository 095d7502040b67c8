use async_trait::async_trait;
use crate::domain::entities::RemoteRepository;
use crate::domain::value_objects::AccessToken;
use crate::shared::result::Result;

/// 远程仓库服务接口
#[async_trait]
pub trait RemoteRepositoryPort: Send + Sync {
    /// 获取令牌对应的登录名
    async fn current_user(&self, token: &AccessToken) -> Result<String>;

    /// 分页拉取当前用户的全部仓库
    async fn list_all(&self, token: &AccessToken) -> Result<Vec<RemoteRepository>>;

    /// 删除远程仓库，成功状态为 204
    async fn delete(&self, token: &AccessToken, owner: &str, name: &str) -> Result<()>;

    /// 重命名远程仓库，成功状态为 200，返回更新后的仓库
    async fn rename(
        &self,
        token: &AccessToken,
        owner: &str,
        name: &str,
        new_name: &str,
    ) -> Result<RemoteRepository>;

    /// 查询仓库元数据，返回 owner 的登录名
    async fn owner_login(&self, token: &AccessToken, owner: &str, name: &str) -> Result<String>;
}
