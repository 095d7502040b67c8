use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use crate::domain::entities::UserSession;
use crate::presentation::routes::AppContext;
use crate::shared::error::DashError;
use crate::shared::result::Result;

/// 会话 Cookie 名称，内容为加密后的 UserSession JSON
pub const SESSION_COOKIE: &str = "repodash_session";

/// 从请求头构造加密 Cookie 容器
pub fn jar(ctx: &AppContext, headers: &HeaderMap) -> PrivateCookieJar {
    PrivateCookieJar::from_headers(headers, ctx.cookie_key.clone())
}

/// 当前请求的登录信息，没有或无法解密时返回 None
pub fn current(jar: &PrivateCookieJar) -> Option<UserSession> {
    let cookie = jar.get(SESSION_COOKIE)?;
    match serde_json::from_str(cookie.value()) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!("Discarding unreadable session cookie: {}", e);
            None
        }
    }
}

pub fn store(jar: PrivateCookieJar, session: &UserSession, secure: bool) -> Result<PrivateCookieJar> {
    let value = serde_json::to_string(session).map_err(|e| DashError::Internal(e.to_string()))?;
    let cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure);
    Ok(jar.add(cookie))
}

pub fn clear(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
