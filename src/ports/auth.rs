use async_trait::async_trait;
use crate::domain::value_objects::AccessToken;
use crate::shared::result::Result;

/// OAuth 授权码流程接口
#[async_trait]
pub trait AuthorizationPort: Send + Sync {
    /// 构造跳转到授权页面的地址
    fn authorize_url(&self, state: &str) -> String;

    /// 用授权码换取访问令牌
    async fn exchange_code(&self, code: &str) -> Result<AccessToken>;
}
