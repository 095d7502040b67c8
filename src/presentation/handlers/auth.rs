use askama::Template;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use crate::domain::entities::UserSession;
use crate::presentation::flash::{self, FlashLevel};
use crate::presentation::routes::AppContext;
use crate::presentation::session;
use crate::presentation::templates::LandingTemplate;
use crate::shared::error::DashError;
use crate::shared::result::Result;

/// 首页：已登录跳转仪表盘，否则开始 OAuth 流程
pub async fn index(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Redirect {
    let jar = session::jar(&ctx, &headers);
    if session::current(&jar).is_some() {
        return Redirect::to("/dashboard");
    }
    begin_login(&ctx).await
}

/// 跳转到 GitHub 授权页面
pub async fn login(State(ctx): State<Arc<AppContext>>) -> Redirect {
    begin_login(&ctx).await
}

async fn begin_login(ctx: &AppContext) -> Redirect {
    let state = Uuid::new_v4().to_string();
    ctx.oauth_states.insert(&state).await;
    Redirect::to(&ctx.authorizer.authorize_url(&state))
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
}

/// OAuth 回调：校验 state，换取令牌，获取用户名，同步仓库
pub async fn callback(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let jar = session::jar(&ctx, &headers);

    let user = match complete_login(&ctx, query).await {
        Ok(user) => user,
        Err(e) => {
            warn!("Login failed: {}", e);
            let jar = flash::push(jar, FlashLevel::Danger, e.flash_message());
            return (jar, Redirect::to("/login_failed")).into_response();
        }
    };

    let jar = match session::store(jar, &user, ctx.config.session.secure_cookies) {
        Ok(jar) => jar,
        Err(e) => return e.into_response(),
    };

    info!("{} logged in", user.username);

    let jar = match ctx.mirror_sync().sync(&user).await {
        Ok(_) => jar,
        Err(e) => {
            warn!("Initial repository sync failed: {}", e);
            flash::push(jar, FlashLevel::Danger, "无法获取仓库，请检查访问令牌。")
        }
    };
    let jar = flash::push(jar, FlashLevel::Success, "登录成功！");

    (jar, Redirect::to("/dashboard")).into_response()
}

async fn complete_login(ctx: &AppContext, query: CallbackQuery) -> Result<UserSession> {
    let state = query.state.ok_or(DashError::InvalidState)?;
    if !ctx.oauth_states.take(&state).await {
        return Err(DashError::InvalidState);
    }
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or(DashError::MissingCode)?;

    let access_token = ctx.authorizer.exchange_code(&code).await?;
    let username = ctx.remote.current_user(&access_token).await?;

    Ok(UserSession {
        access_token,
        username,
    })
}

/// 退出登录
pub async fn logout(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let jar = session::clear(session::jar(&ctx, &headers));
    let jar = flash::push(jar, FlashLevel::Info, "已退出登录。");
    (jar, Redirect::to("/signed_out"))
}

pub async fn login_failed(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    landing(&ctx, &headers, "登录失败")
}

pub async fn signed_out(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    landing(&ctx, &headers, "已退出")
}

fn landing(ctx: &AppContext, headers: &HeaderMap, heading: &str) -> Result<impl IntoResponse> {
    let (jar, flashes) = flash::take(session::jar(ctx, headers));
    let template = LandingTemplate {
        heading: heading.to_string(),
        flashes,
    };
    Ok((jar, Html(template.render()?)))
}
