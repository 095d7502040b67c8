use std::sync::Arc;
use tracing::info;
use crate::domain::entities::{MirroredRepository, UserSession};
use crate::domain::value_objects::RepoName;
use crate::ports::remote::RemoteRepositoryPort;
use crate::ports::repository::MirrorPort;
use crate::shared::error::DashError;
use crate::shared::result::Result;

/// 删除/重命名：先调用远程，成功后再修改本地镜像
pub struct RepositoryMutations {
    mirror: Arc<dyn MirrorPort>,
    remote: Arc<dyn RemoteRepositoryPort>,
    check_ownership: bool,
}

impl RepositoryMutations {
    pub fn new(
        mirror: Arc<dyn MirrorPort>,
        remote: Arc<dyn RemoteRepositoryPort>,
        check_ownership: bool,
    ) -> Self {
        Self {
            mirror,
            remote,
            check_ownership,
        }
    }

    async fn load(&self, id: i64) -> Result<MirroredRepository> {
        self.mirror
            .find_by_id(id)
            .await?
            .ok_or(DashError::RepositoryNotFound(id))
    }

    /// 远程调用使用记录地址里的 owner，而不是当前登录名
    fn owner_of(repo: &MirroredRepository) -> Result<String> {
        repo.owner()
            .ok_or_else(|| DashError::Internal(format!("no owner in repository url {}", repo.url)))
    }

    /// 删除仓库，远程返回 204 后才删除本地记录
    pub async fn delete(&self, session: &UserSession, id: i64) -> Result<MirroredRepository> {
        let repo = self.load(id).await?;
        let owner = Self::owner_of(&repo)?;
        let token = &session.access_token;

        if self.check_ownership {
            let login = self.remote.owner_login(token, &owner, &repo.name).await?;
            if !login.eq_ignore_ascii_case(&session.username) {
                return Err(DashError::NotOwner {
                    user: session.username.clone(),
                    repo: format!("{}/{}", owner, repo.name),
                });
            }
        }

        self.remote.delete(token, &owner, &repo.name).await?;
        self.mirror.delete(id).await?;

        info!("{} deleted repository {}/{} (id {})", session.username, owner, repo.name, id);
        Ok(repo)
    }

    /// 重命名仓库，远程返回 200 后才更新本地名称和地址
    pub async fn rename(
        &self,
        session: &UserSession,
        id: i64,
        new_name: Option<&str>,
    ) -> Result<MirroredRepository> {
        let new_name = RepoName::parse(new_name.unwrap_or_default())?;
        let repo = self.load(id).await?;
        let owner = Self::owner_of(&repo)?;

        // 本地名称唯一，新名称已被其他记录占用时拒绝
        if let Some(existing) = self.mirror.find_by_name(new_name.as_str()).await? {
            if existing.id != id {
                return Err(DashError::InvalidName(format!("{} is already mirrored", new_name)));
            }
        }

        let renamed = self
            .remote
            .rename(&session.access_token, &owner, &repo.name, new_name.as_str())
            .await?;
        self.mirror.update(id, &renamed.name, &renamed.html_url).await?;

        info!("{} renamed repository {}/{} to {}", session.username, owner, repo.name, renamed.name);
        Ok(MirroredRepository {
            name: renamed.name,
            url: renamed.html_url,
            ..repo
        })
    }
}
