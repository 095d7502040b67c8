use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};

/// 一次性提示消息的 Cookie 名称
pub const FLASH_COOKIE: &str = "repodash_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
    Info,
}

/// 跳转后在下一个页面展示的提示消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn css_class(&self) -> &'static str {
        match self.level {
            FlashLevel::Success => "alert-success",
            FlashLevel::Danger => "alert-danger",
            FlashLevel::Info => "alert-info",
        }
    }
}

fn read(jar: &PrivateCookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        .and_then(|c| serde_json::from_str(c.value()).ok())
        .unwrap_or_default()
}

/// 追加一条提示消息
pub fn push(jar: PrivateCookieJar, level: FlashLevel, message: impl Into<String>) -> PrivateCookieJar {
    let mut flashes = read(&jar);
    flashes.push(Flash {
        level,
        message: message.into(),
    });

    match serde_json::to_string(&flashes) {
        Ok(value) => jar.add(
            Cookie::build((FLASH_COOKIE, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        ),
        Err(e) => {
            tracing::warn!("Failed to encode flash messages: {}", e);
            jar
        }
    }
}

/// 取出全部提示消息并清除 Cookie
pub fn take(jar: PrivateCookieJar) -> (PrivateCookieJar, Vec<Flash>) {
    let flashes = read(&jar);
    if flashes.is_empty() {
        return (jar, flashes);
    }
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flashes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Key;

    #[test]
    fn messages_accumulate_and_are_consumed_once() {
        let jar = PrivateCookieJar::new(Key::derive_from(&[7u8; 64]));
        let jar = push(jar, FlashLevel::Danger, "无法获取仓库，请检查访问令牌。");
        let jar = push(jar, FlashLevel::Success, "登录成功！");

        let (jar, flashes) = take(jar);
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[0].css_class(), "alert-danger");
        assert_eq!(flashes[1].message, "登录成功！");

        let (_, again) = take(jar);
        assert!(again.is_empty());
    }
}
