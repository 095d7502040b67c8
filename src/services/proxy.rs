use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use crate::shared::error::DashError;
use crate::shared::result::Result;

const MAX_REDIRECTS: usize = 5;

/// 代理响应
#[derive(Debug)]
pub struct ProxiedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// 只允许访问白名单主机的 HTTPS 抓取
pub struct AllowListedFetcher {
    http: reqwest::Client,
    allowed_hosts: Arc<Vec<String>>,
}

fn is_allowed(url: &Url, allowed_hosts: &[String]) -> bool {
    if url.scheme() != "https" || url.port().is_some() {
        return false;
    }
    if !url.username().is_empty() || url.password().is_some() {
        return false;
    }
    match url.host_str() {
        Some(host) => allowed_hosts.iter().any(|h| h.eq_ignore_ascii_case(host)),
        None => false,
    }
}

impl AllowListedFetcher {
    pub fn new(allowed_hosts: Vec<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let allowed_hosts = Arc::new(allowed_hosts);
        let redirect_hosts = allowed_hosts.clone();

        // 重定向目标同样要在白名单内
        let policy = Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.stop()
            } else if is_allowed(attempt.url(), &redirect_hosts) {
                attempt.follow()
            } else {
                attempt.stop()
            }
        });

        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(policy)
            .build()?;

        Ok(Self { http, allowed_hosts })
    }

    /// 解析并校验目标地址
    pub fn check(&self, raw: &str) -> Result<Url> {
        let url = Url::parse(raw).map_err(|_| DashError::ProxyDenied(raw.to_string()))?;
        if !is_allowed(&url, &self.allowed_hosts) {
            warn!("Rejected proxy target {}", raw);
            return Err(DashError::ProxyDenied(raw.to_string()));
        }
        Ok(url)
    }

    pub async fn fetch(&self, raw: &str) -> Result<ProxiedResponse> {
        let url = self.check(raw)?;
        self.fetch_url(url).await
    }

    async fn fetch_url(&self, url: Url) -> Result<ProxiedResponse> {
        debug!("Proxying {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        Ok(ProxiedResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> AllowListedFetcher {
        AllowListedFetcher::new(
            vec!["github.com".to_string(), "api.github.com".to_string()],
            "repodash-test",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn allows_listed_https_hosts() {
        let f = fetcher();
        assert!(f.check("https://github.com/alice/repo").is_ok());
        assert!(f.check("https://API.GITHUB.COM/repos/alice/repo").is_ok());
    }

    #[test]
    fn rejects_everything_else() {
        let f = fetcher();
        for raw in [
            "http://github.com/alice/repo",
            "https://evil.example.com/",
            "https://github.com.evil.example.com/",
            "https://github.com:8443/",
            "https://user:pw@github.com/",
            "file:///etc/passwd",
            "not a url",
            "",
        ] {
            assert!(
                matches!(f.check(raw), Err(DashError::ProxyDenied(_))),
                "{} should be rejected",
                raw
            );
        }
    }

    #[tokio::test]
    async fn denied_targets_are_never_fetched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = fetcher().fetch(&format!("{}/anything", server.uri())).await.unwrap_err();
        assert!(matches!(err, DashError::ProxyDenied(_)));
    }

    #[tokio::test]
    async fn passes_through_status_type_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/readme"))
            .respond_with(
                ResponseTemplate::new(203)
                    .insert_header("content-type", "text/plain")
                    .set_body_string("hello"),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/readme", server.uri())).unwrap();
        let proxied = fetcher().fetch_url(url).await.unwrap();
        assert_eq!(proxied.status, 203);
        assert_eq!(proxied.content_type.as_deref(), Some("text/plain"));
        assert_eq!(&proxied.body[..], b"hello");
    }
}
