use axum::{
    extract::{rejection::{FormRejection, PathRejection}, Form, Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;
use crate::presentation::flash::{self, FlashLevel};
use crate::presentation::routes::AppContext;
use crate::presentation::session;
use crate::shared::error::DashError;

/// 非数字的 id 按找不到仓库处理
fn repository_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, DashError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            warn!("Rejected repository id: {}", rejection);
            Err(DashError::RepositoryNotFound(0))
        }
    }
}

/// 删除仓库（先远程后本地）
pub async fn delete_repo(
    State(ctx): State<Arc<AppContext>>,
    path: Result<Path<i64>, PathRejection>,
    headers: HeaderMap,
) -> Response {
    let jar = session::jar(&ctx, &headers);
    let Some(user) = session::current(&jar) else {
        return Redirect::to("/login").into_response();
    };

    let result = match repository_id(path) {
        Ok(id) => ctx.mutations().delete(&user, id).await,
        Err(e) => Err(e),
    };
    let jar = match result {
        Ok(_) => flash::push(jar, FlashLevel::Success, "仓库删除成功。"),
        Err(e) => {
            warn!("Delete of repository failed: {}", e);
            flash::push(jar, FlashLevel::Danger, e.flash_message())
        }
    };

    (jar, Redirect::to("/dashboard")).into_response()
}

#[derive(Deserialize)]
pub struct RenameForm {
    #[serde(default)]
    new_name: Option<String>,
}

/// 重命名仓库（先远程后本地）
pub async fn rename_repo(
    State(ctx): State<Arc<AppContext>>,
    path: Result<Path<i64>, PathRejection>,
    headers: HeaderMap,
    form: Result<Form<RenameForm>, FormRejection>,
) -> Response {
    let jar = session::jar(&ctx, &headers);
    let Some(user) = session::current(&jar) else {
        return Redirect::to("/login").into_response();
    };

    // 表单解析失败和缺少字段一样处理
    let new_name = form.ok().and_then(|Form(f)| f.new_name);

    let result = match repository_id(path) {
        Ok(id) => ctx.mutations().rename(&user, id, new_name.as_deref()).await,
        Err(e) => Err(e),
    };
    let jar = match result {
        Ok(_) => flash::push(jar, FlashLevel::Success, "仓库重命名成功。"),
        Err(e) => {
            warn!("Rename of repository failed: {}", e);
            flash::push(jar, FlashLevel::Danger, e.flash_message())
        }
    };

    (jar, Redirect::to("/dashboard")).into_response()
}
