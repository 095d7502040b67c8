use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use crate::domain::value_objects::{AccessToken, Pagination};

/// 本地镜像中的仓库记录
#[derive(Debug, Clone, PartialEq)]
pub struct MirroredRepository {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub synced_at: DateTime<Utc>,
}

impl MirroredRepository {
    pub fn new(name: String, url: String) -> Self {
        Self {
            id: 0, // 将由数据库生成
            name,
            url,
            synced_at: Utc::now(),
        }
    }

    /// 仓库地址中的 owner，例如 `https://github.com/acme/tool` 为 `acme`
    pub fn owner(&self) -> Option<String> {
        let url = Url::parse(&self.url).ok()?;
        let owner = url.path_segments()?.next()?;
        if owner.is_empty() {
            return None;
        }
        Some(owner.to_string())
    }
}

/// 远程服务返回的仓库信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub name: String,
    pub html_url: String,
    pub owner: String,
}

/// 当前浏览器会话的登录信息，每个请求显式传递
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub access_token: AccessToken,
    pub username: String,
}

/// 一次镜像同步的结果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub inserted: usize,
    pub updated: usize,
    pub removed: usize,
    pub skipped: usize,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.updated == 0 && self.removed == 0
    }
}

/// 仪表盘的一页数据
#[derive(Debug, Clone)]
pub struct RepositoryPage {
    pub items: Vec<MirroredRepository>,
    pub pagination: Pagination,
    pub search: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(url: &str) -> MirroredRepository {
        MirroredRepository::new("tool".to_string(), url.to_string())
    }

    #[test]
    fn owner_comes_from_the_url() {
        assert_eq!(repo("https://github.com/acme/tool").owner().as_deref(), Some("acme"));
        assert_eq!(repo("https://github.com/alice/tool/").owner().as_deref(), Some("alice"));
        assert_eq!(repo("https://github.com/").owner(), None);
        assert_eq!(repo("not a url").owner(), None);
    }
}
