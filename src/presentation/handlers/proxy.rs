use axum::{
    extract::{Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;
use crate::presentation::flash::{self, FlashLevel};
use crate::presentation::routes::AppContext;
use crate::presentation::session;
use crate::shared::error::DashError;

#[derive(Deserialize)]
pub struct ProxyParams {
    url: Option<String>,
}

/// 白名单内地址的透传抓取
pub async fn proxy_repo(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Query(params): Query<ProxyParams>,
) -> Response {
    let jar = session::jar(&ctx, &headers);
    if session::current(&jar).is_none() {
        return Redirect::to("/login").into_response();
    }

    let target = params.url.unwrap_or_default();
    match ctx.fetcher.fetch(&target).await {
        Ok(proxied) => {
            let status = StatusCode::from_u16(proxied.status).unwrap_or(StatusCode::BAD_GATEWAY);
            let mut response = (status, proxied.body).into_response();
            if let Some(value) = proxied
                .content_type
                .and_then(|ct| HeaderValue::from_str(&ct).ok())
            {
                response.headers_mut().insert(CONTENT_TYPE, value);
            }
            response
        }
        Err(e) => {
            warn!("Proxy request for {} failed: {}", target, e);
            let message = match &e {
                DashError::ProxyDenied(_) => e.flash_message(),
                _ => "代理请求失败。".to_string(),
            };
            (flash::push(jar, FlashLevel::Danger, message), Redirect::to("/dashboard")).into_response()
        }
    }
}
