use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use crate::shared::error::DashError;
use crate::shared::result::Result;

/// Cookie 密钥的最小长度（字节）
pub const MIN_SECRET_KEY_LEN: usize = 32;

/// 应用配置
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub github: GithubConfig,
    pub session: SessionConfig,
    pub dashboard: DashboardConfig,
    pub mutations: MutationConfig,
    pub proxy: ProxyConfig,
    pub cache: CacheConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 10000)),
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub sqlite_path: PathBuf,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from("repos.db"),
            max_connections: 5,
        }
    }
}

/// GitHub OAuth 与 REST API 配置
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GithubConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Option<String>,
    pub scope: String,
    pub authorize_url: String,
    pub token_url: String,
    pub api_base_url: String,
    pub user_agent: String,
    pub per_page: usize,
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: None,
            scope: "repo delete_repo".to_string(),
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
            api_base_url: "https://api.github.com".to_string(),
            user_agent: concat!("repodash/", env!("CARGO_PKG_VERSION")).to_string(),
            per_page: 100,
            timeout_secs: 30,
        }
    }
}

// client_secret 不能出现在日志里
impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("api_base_url", &self.api_base_url)
            .field("per_page", &self.per_page)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// 会话 Cookie 配置
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    pub secret_key: String,
    pub secure_cookies: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            secure_cookies: false,
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret_key", &"<redacted>")
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

/// 仪表盘配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub page_size: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

/// 删除/重命名配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MutationConfig {
    /// 删除前先确认当前用户是仓库所有者
    pub check_ownership: bool,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self { check_ownership: true }
    }
}

/// 代理配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub allowed_hosts: Vec<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: vec!["github.com".to_string(), "api.github.com".to_string()],
        }
    }
}

/// OAuth state 缓存配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_capacity: u64,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10000,
            ttl_secs: 600,
        }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| DashError::Config(e.to_string()))?;
        Ok(config)
    }

    /// 从命令行参数、配置文件和环境变量加载配置
    pub fn from_args_and_file(
        config_path: &Path,
        db_path: Option<PathBuf>,
        bind_address: Option<SocketAddr>,
    ) -> Result<Self> {
        let mut config = if config_path.exists() {
            Self::from_file(config_path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok());

        // 命令行参数覆盖配置文件
        if let Some(db_path) = db_path {
            config.database.sqlite_path = db_path;
        }
        if let Some(bind_address) = bind_address {
            config.server.bind_address = bind_address;
        }

        config.validate()?;
        Ok(config)
    }

    /// 用环境变量覆盖密钥类配置
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("GITHUB_CLIENT_ID") {
            self.github.client_id = v;
        }
        if let Some(v) = lookup("GITHUB_CLIENT_SECRET") {
            self.github.client_secret = v;
        }
        if let Some(v) = lookup("GITHUB_REDIRECT_URI") {
            self.github.redirect_uri = Some(v);
        }
        if let Some(v) = lookup("SECRET_KEY") {
            self.session.secret_key = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.github.client_id.trim().is_empty() {
            return Err(DashError::Config("GITHUB_CLIENT_ID is not set".to_string()));
        }
        if self.github.client_secret.trim().is_empty() {
            return Err(DashError::Config("GITHUB_CLIENT_SECRET is not set".to_string()));
        }
        if self.session.secret_key.len() < MIN_SECRET_KEY_LEN {
            return Err(DashError::Config(format!(
                "SECRET_KEY must be at least {} bytes",
                MIN_SECRET_KEY_LEN
            )));
        }
        if self.dashboard.page_size == 0 {
            return Err(DashError::Config("dashboard.page_size must be positive".to_string()));
        }
        if self.github.per_page == 0 || self.github.per_page > 100 {
            return Err(DashError::Config("github.per_page must be within 1..=100".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    let mut config = Config::default();
    config.github.client_id = "test-client".to_string();
    config.github.client_secret = "test-secret".to_string();
    config.session.secret_key = "0123456789abcdef0123456789abcdef-test".to_string();
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\npage_size = 25\n\n[proxy]\nallowed_hosts = [\"example.com\"]").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.dashboard.page_size, 25);
        assert_eq!(config.proxy.allowed_hosts, vec!["example.com".to_string()]);
        assert_eq!(config.github.per_page, 100);
        assert!(config.mutations.check_ownership);
    }

    #[test]
    fn env_overrides_secrets() {
        let env: HashMap<&str, String> = [
            ("GITHUB_CLIENT_ID", "id-from-env".to_string()),
            ("GITHUB_CLIENT_SECRET", "secret-from-env".to_string()),
            ("SECRET_KEY", "k".repeat(40)),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).cloned());

        assert_eq!(config.github.client_id, "id-from-env");
        assert_eq!(config.github.client_secret, "secret-from-env");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn short_secret_key_is_rejected() {
        let mut config = test_config();
        config.session.secret_key = "too-short".to_string();
        assert!(matches!(config.validate(), Err(DashError::Config(_))));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = test_config();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("test-secret"));
        assert!(!rendered.contains("0123456789abcdef"));
    }
}
