use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// 统一的错误类型
#[derive(Debug, thiserror::Error)]
pub enum DashError {
    /// SQLx 数据库错误
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// HTTP 客户端错误
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 远程 API 返回了非预期的状态码
    #[error("Remote {action} failed with HTTP {status}")]
    RemoteStatus { action: &'static str, status: u16 },

    /// 授权服务器没有返回 access_token
    #[error("Authorization response carried no access token")]
    MissingToken,

    /// 回调缺少授权码
    #[error("Authorization callback carried no code")]
    MissingCode,

    /// OAuth state 无效或已过期
    #[error("Invalid or expired OAuth state")]
    InvalidState,

    /// 本地镜像中找不到仓库
    #[error("Repository not found: {0}")]
    RepositoryNotFound(i64),

    /// 仓库名称无效
    #[error("Invalid repository name: {0}")]
    InvalidName(String),

    /// 当前用户不是仓库所有者
    #[error("{user} does not own {repo}")]
    NotOwner { user: String, repo: String },

    /// 代理地址不在允许列表中
    #[error("Proxy target not allowed: {0}")]
    ProxyDenied(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),

    /// Template 渲染错误
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl DashError {
    /// 转换为展示给用户的提示消息
    pub fn flash_message(&self) -> String {
        match self {
            DashError::RepositoryNotFound(_) => "仓库未找到。".to_string(),
            DashError::InvalidName(_) => "重命名失败，请确保输入有效的名称。".to_string(),
            DashError::NotOwner { .. } => "你不是该仓库的所有者，无法删除。".to_string(),
            DashError::ProxyDenied(_) => "不允许代理该地址。".to_string(),
            DashError::MissingToken | DashError::MissingCode | DashError::InvalidState => {
                "登录失败，请重试。".to_string()
            }
            DashError::RemoteStatus { action: "token exchange", .. } => {
                "获取访问令牌失败，请重试。".to_string()
            }
            DashError::RemoteStatus { action, status } => {
                format!("远程操作失败（{}，HTTP {}）。", action, status)
            }
            DashError::Http(_) => "无法连接远程服务，请稍后重试。".to_string(),
            _ => "服务器内部错误。".to_string(),
        }
    }
}

/// 用于 Axum 的错误响应实现
impl IntoResponse for DashError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DashError::RepositoryNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            DashError::InvalidName(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            DashError::ProxyDenied(_) => (StatusCode::FORBIDDEN, self.to_string()),
            DashError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            DashError::RemoteStatus { .. } | DashError::Http(_) => {
                (StatusCode::BAD_GATEWAY, "Remote service error".to_string())
            }
            DashError::Sqlx(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string()),
        };

        tracing::error!("Request error: {}", self);

        (status, message).into_response()
    }
}
