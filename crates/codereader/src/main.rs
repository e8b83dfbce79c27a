//! Code indexing and semantic search server.

use codereader_config::ApplicationConfig;
use std::net::SocketAddr;
use tracing::info;

type MainResult = anyhow::Result<()>;

#[tokio::main]
async fn main() -> MainResult {
    codereader_common::init::initialize_environment();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ApplicationConfig::from_env()?;
    info!(port = config.port, "configuration loaded");

    let state = codereader_api::bootstrap::initialize_app_state(&config)
        .await
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    let app = codereader_api::routes::create_router(state);

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
