use std::net::SocketAddr;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cms_server::config::AppConfig;
use cms_server::database::init_db;
use cms_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cms_server=info,common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = AppConfig::load().context("Failed to load config")?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let db = init_db(&config.database)
        .await
        .context("Failed to initialize database")?;
    info!("Database connected");

    let state = AppState::init(config, db)
        .await
        .context("Failed to open asset stores")?;
    for (collection, report) in state
        .reconcile()
        .await
        .context("Failed to reconcile asset stores")?
    {
        info!(%collection, ?report, "Startup reconciliation done");
    }

    let app = cms_server::build_router(state);

    info!("Server running at http://{}", addr);
    info!("API docs at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
