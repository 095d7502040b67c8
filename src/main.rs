use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use axum_extra::extract::cookie::Key;
use clap::Parser;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod shared;
mod domain;
mod ports;
mod infrastructure;
mod services;
mod presentation;

use shared::config::Config;
use shared::error::DashError;
use shared::result::Result;
use infrastructure::cache::MokaCache;
use infrastructure::github::GithubClient;
use infrastructure::sqlite::repository_repo::SqliteMirrorRepository;
use presentation::routes::AppContext;
use services::proxy::AllowListedFetcher;


#[derive(Parser, Debug)]
#[clap(name = "repodash")]
#[clap(version)]
#[clap(about = "Mirror and manage your GitHub repositories from a small web dashboard")]
pub struct Args {
    /// SQLite database path
    #[clap(short, long, value_parser)]
    db_path: Option<PathBuf>,

    /// Server bind address
    #[clap(short, long)]
    bind_address: Option<SocketAddr>,

    /// Optional TOML config file
    #[clap(short, long, value_parser, default_value = "config.toml")]
    config: PathBuf,

    /// Emit logs as JSON lines
    #[clap(long)]
    log_json: bool,
}


#[tokio::main]
async fn main() -> Result<()> {
    // .env 不存在时忽略
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // 初始化日志
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if args.log_json {
        subscriber.json().init();
    } else {
        subscriber.pretty().init();
    }

    // 加载配置
    let config = Config::from_args_and_file(&args.config, args.db_path.clone(), args.bind_address)?;
    let config = Arc::new(config);

    info!("Starting repodash server...");
    info!("Configuration loaded: {:?}", config);

    // 初始化 SQLite 数据库
    let sqlite_pool = infrastructure::sqlite::create_pool(
        &config.database.sqlite_path,
        config.database.max_connections,
    )
    .await?;

    // 运行数据库迁移
    info!("Running database migrations...");
    infrastructure::sqlite::run_migrations(&sqlite_pool).await?;
    info!("Database migrations completed");

    let http = GithubClient::build_http_client(&config.github)?;
    let github = Arc::new(GithubClient::new(http, config.github.clone()));
    let fetcher = AllowListedFetcher::new(
        config.proxy.allowed_hosts.clone(),
        &config.github.user_agent,
        Duration::from_secs(config.github.timeout_secs),
    )?;
    let oauth_states = Arc::new(MokaCache::new(
        config.cache.max_capacity,
        Duration::from_secs(config.cache.ttl_secs),
    ));

    let app_context = Arc::new(AppContext {
        mirror_store: Arc::new(SqliteMirrorRepository::new(sqlite_pool.clone())),
        remote: github.clone(),
        authorizer: github,
        oauth_states,
        fetcher: Arc::new(fetcher),
        cookie_key: Key::derive_from(config.session.secret_key.as_bytes()),
        config: config.clone(),
    });

    let app = presentation::routes::create_app_router(app_context)
        .nest_service("/statics", ServeDir::new("statics"))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .map_err(DashError::Io)?;

    info!("Server listening on {}", config.server.bind_address);
    info!("Dashboard available at: http://{}/", config.server.bind_address);

    axum::serve(listener, app)
        .await
        .map_err(|e| DashError::Internal(e.to_string()))?;

    Ok(())
}
