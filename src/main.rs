use anyhow::Context;
use guardtrade::{api, config::Config, Monitor};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("Configuration error")?;
    let port = config.port;

    let monitor = Arc::new(Monitor::new(&config));
    if let Some(owner) = config.default_owner.clone() {
        monitor.connect(owner).await;
    }

    tracing::info!(
        assets = ?config.watched_assets,
        tiers = ?config.tiers,
        "Risk monitor initialized"
    );

    let app = api::create_router(api::AppState::new(monitor, config));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
