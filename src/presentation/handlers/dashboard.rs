use askama::Template;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;
use crate::presentation::flash::{self, FlashLevel};
use crate::presentation::routes::AppContext;
use crate::presentation::session;
use crate::presentation::templates::DashboardTemplate;
use crate::shared::result::Result;

#[derive(Deserialize)]
pub struct DashboardParams {
    q: Option<String>,
    page: Option<String>,
}

/// 仪表盘：搜索 + 分页
pub async fn dashboard(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Query(params): Query<DashboardParams>,
) -> Result<Response> {
    let jar = session::jar(&ctx, &headers);
    let Some(user) = session::current(&jar) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let search = params.q.unwrap_or_default();
    // 非法页码按第一页处理
    let requested_page = params
        .page
        .as_deref()
        .and_then(|p| p.trim().parse::<u32>().ok())
        .unwrap_or(1);

    let page = ctx.dashboard().page(&search, requested_page).await?;
    let (jar, flashes) = flash::take(jar);
    let template = DashboardTemplate::new(user.username, page, flashes);

    Ok((jar, Html(template.render()?)).into_response())
}

/// 手动触发一次完整同步
pub async fn refresh(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Response {
    let jar = session::jar(&ctx, &headers);
    let Some(user) = session::current(&jar) else {
        return Redirect::to("/login").into_response();
    };

    let jar = match ctx.mirror_sync().sync(&user).await {
        Ok(report) => flash::push(
            jar,
            FlashLevel::Success,
            format!(
                "同步完成：新增 {}，更新 {}，移除 {}。",
                report.inserted, report.updated, report.removed
            ),
        ),
        Err(e) => {
            warn!("Repository sync failed: {}", e);
            flash::push(jar, FlashLevel::Danger, "无法获取仓库，请检查访问令牌。")
        }
    };

    (jar, Redirect::to("/dashboard")).into_response()
}
