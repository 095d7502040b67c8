use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use crate::domain::entities::RemoteRepository;
use crate::domain::value_objects::AccessToken;
use crate::ports::auth::AuthorizationPort;
use crate::ports::remote::RemoteRepositoryPort;
use crate::shared::config::GithubConfig;
use crate::shared::error::DashError;
use crate::shared::result::Result;

const GITHUB_JSON: &str = "application/vnd.github+json";

/// GitHub 客户端实现（基于 reqwest），同时负责 OAuth 和 REST API
pub struct GithubClient {
    http: reqwest::Client,
    config: GithubConfig,
}

#[derive(Deserialize)]
struct ApiOwner {
    login: String,
}

#[derive(Deserialize)]
struct ApiRepository {
    name: String,
    html_url: String,
    owner: ApiOwner,
}

impl From<ApiRepository> for RemoteRepository {
    fn from(repo: ApiRepository) -> Self {
        Self {
            name: repo.name,
            html_url: repo.html_url,
            owner: repo.owner.login,
        }
    }
}

#[derive(Deserialize)]
struct ApiUser {
    login: String,
}

/// GitHub 出错时也可能返回 200，错误放在 error 字段里
#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

impl GithubClient {
    pub fn new(http: reqwest::Client, config: GithubConfig) -> Self {
        Self { http, config }
    }

    /// 按配置构造共享的 HTTP 客户端
    pub fn build_http_client(config: &GithubConfig) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(client)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    fn authed(&self, request: RequestBuilder, token: &AccessToken) -> RequestBuilder {
        request
            .bearer_auth(token.as_str())
            .header(ACCEPT, GITHUB_JSON)
    }
}

fn expect_status(response: &Response, expected: StatusCode, action: &'static str) -> Result<()> {
    if response.status() != expected {
        return Err(DashError::RemoteStatus {
            action,
            status: response.status().as_u16(),
        });
    }
    Ok(())
}

#[async_trait]
impl AuthorizationPort for GithubClient {
    fn authorize_url(&self, state: &str) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("client_id", &self.config.client_id)
            .append_pair("scope", &self.config.scope)
            .append_pair("state", state);
        if let Some(redirect_uri) = &self.config.redirect_uri {
            query.append_pair("redirect_uri", redirect_uri);
        }
        format!("{}?{}", self.config.authorize_url, query.finish())
    }

    async fn exchange_code(&self, code: &str) -> Result<AccessToken> {
        let response = self
            .http
            .post(&self.config.token_url)
            .header(ACCEPT, "application/json")
            .json(&serde_json::json!({
                "client_id": self.config.client_id,
                "client_secret": self.config.client_secret,
                "code": code,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DashError::RemoteStatus {
                action: "token exchange",
                status: response.status().as_u16(),
            });
        }

        let body: TokenResponse = response.json().await?;
        match body.access_token.filter(|t| !t.is_empty()) {
            Some(token) => Ok(AccessToken::new(token)),
            None => {
                debug!("Token response without access_token: {:?}", body.error);
                Err(DashError::MissingToken)
            }
        }
    }
}

#[async_trait]
impl RemoteRepositoryPort for GithubClient {
    async fn current_user(&self, token: &AccessToken) -> Result<String> {
        let response = self
            .authed(self.http.get(self.api_url("/user")), token)
            .send()
            .await?;
        expect_status(&response, StatusCode::OK, "user lookup")?;

        let user: ApiUser = response.json().await?;
        Ok(user.login)
    }

    async fn list_all(&self, token: &AccessToken) -> Result<Vec<RemoteRepository>> {
        let per_page = self.config.per_page;
        let mut repositories = Vec::new();
        let mut page = 1usize;

        // 直到返回的页不满为止
        loop {
            let response = self
                .authed(self.http.get(self.api_url("/user/repos")), token)
                .query(&[("per_page", per_page.to_string()), ("page", page.to_string())])
                .send()
                .await?;
            expect_status(&response, StatusCode::OK, "list")?;

            let batch: Vec<ApiRepository> = response.json().await?;
            let fetched = batch.len();
            debug!("Fetched page {} with {} repositories", page, fetched);
            repositories.extend(batch.into_iter().map(RemoteRepository::from));

            if fetched < per_page {
                break;
            }
            page += 1;
        }

        info!("Listed {} remote repositories", repositories.len());
        Ok(repositories)
    }

    async fn delete(&self, token: &AccessToken, owner: &str, name: &str) -> Result<()> {
        let response = self
            .authed(self.http.delete(self.api_url(&format!("/repos/{}/{}", owner, name))), token)
            .send()
            .await?;
        expect_status(&response, StatusCode::NO_CONTENT, "delete")
    }

    async fn rename(
        &self,
        token: &AccessToken,
        owner: &str,
        name: &str,
        new_name: &str,
    ) -> Result<RemoteRepository> {
        let response = self
            .authed(self.http.patch(self.api_url(&format!("/repos/{}/{}", owner, name))), token)
            .json(&serde_json::json!({ "name": new_name }))
            .send()
            .await?;
        expect_status(&response, StatusCode::OK, "rename")?;

        let repo: ApiRepository = response.json().await?;
        Ok(repo.into())
    }

    async fn owner_login(&self, token: &AccessToken, owner: &str, name: &str) -> Result<String> {
        let response = self
            .authed(self.http.get(self.api_url(&format!("/repos/{}/{}", owner, name))), token)
            .send()
            .await?;
        expect_status(&response, StatusCode::OK, "ownership check")?;

        let repo: ApiRepository = response.json().await?;
        Ok(repo.owner.login)
    }
}
