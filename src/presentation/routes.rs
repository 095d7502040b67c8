use axum::{Router, routing::{get, post}};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;
use crate::ports::auth::AuthorizationPort;
use crate::ports::cache::CachePort;
use crate::ports::remote::RemoteRepositoryPort;
use crate::ports::repository::MirrorPort;
use crate::presentation::handlers;
use crate::services::dashboard::DashboardQuery;
use crate::services::mutation::RepositoryMutations;
use crate::services::proxy::AllowListedFetcher;
use crate::services::sync::MirrorSync;
use crate::shared::config::Config;

/// 应用状态
pub struct AppContext {
    pub mirror_store: Arc<dyn MirrorPort>,
    pub remote: Arc<dyn RemoteRepositoryPort>,
    pub authorizer: Arc<dyn AuthorizationPort>,
    pub oauth_states: Arc<dyn CachePort>,
    pub fetcher: Arc<AllowListedFetcher>,
    pub cookie_key: Key,
    pub config: Arc<Config>,
}

impl AppContext {
    pub fn mirror_sync(&self) -> MirrorSync {
        MirrorSync::new(self.mirror_store.clone(), self.remote.clone())
    }

    pub fn mutations(&self) -> RepositoryMutations {
        RepositoryMutations::new(
            self.mirror_store.clone(),
            self.remote.clone(),
            self.config.mutations.check_ownership,
        )
    }

    pub fn dashboard(&self) -> DashboardQuery {
        DashboardQuery::new(self.mirror_store.clone(), self.config.dashboard.page_size)
    }
}

/// 创建应用路由
pub fn create_app_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // 登录流程
        .route("/", get(handlers::auth::index))
        .route("/login", get(handlers::auth::login))
        .route("/callback", get(handlers::auth::callback))
        .route("/login_failed", get(handlers::auth::login_failed))
        .route("/signed_out", get(handlers::auth::signed_out))
        .route("/logout", post(handlers::auth::logout))

        // 仪表盘
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route("/refresh", post(handlers::dashboard::refresh))

        // 仓库操作
        .route("/delete_repo/{id}", post(handlers::repository::delete_repo))
        .route("/rename_repo/{id}", post(handlers::repository::rename_repo))
        .route("/proxy_repo", get(handlers::proxy::proxy_repo))

        .with_state(ctx)
}
