use serde::{Deserialize, Serialize};
use std::fmt;
use crate::shared::error::DashError;

/// 仓库名称最大长度
pub const MAX_NAME_LEN: usize = 100;

/// 仓库地址最大长度
pub const MAX_URL_LEN: usize = 200;

/// 访问令牌值对象，Debug 输出时隐藏内容
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// 仓库名称值对象
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoName(String);

impl RepoName {
    /// 校验名称：非空、不超过 100 个字符、只包含 GitHub 允许的字符
    pub fn parse(raw: &str) -> Result<Self, DashError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(DashError::InvalidName("empty name".to_string()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(DashError::InvalidName(format!("longer than {} chars", MAX_NAME_LEN)));
        }
        if name == "." || name == ".." {
            return Err(DashError::InvalidName(name.to_string()));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(DashError::InvalidName(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 分页值对象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    page_size: u32,
    total: u64,
}

impl Pagination {
    /// 请求的页码会被限制在 1..=total_pages 之间
    pub fn new(requested_page: u32, page_size: u32, total: u64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = Self::pages_for(total, page_size);
        Self {
            page: requested_page.clamp(1, total_pages),
            page_size,
            total,
        }
    }

    fn pages_for(total: u64, page_size: u32) -> u32 {
        let pages = total.div_ceil(u64::from(page_size)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u32 {
        Self::pages_for(self.total, self.page_size)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn prev_page(&self) -> Option<u32> {
        (self.page > 1).then(|| self.page - 1)
    }

    pub fn next_page(&self) -> Option<u32> {
        (self.page < self.total_pages()).then(|| self.page + 1)
    }
}
