use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intellipark_api::{app, AppState};
use intellipark_core::engine::LifecycleEngine;
use intellipark_core::staging::InMemoryStaging;
use intellipark_store::app_config::Config;
use intellipark_store::{RtdbClient, XenditClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intellipark_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("failed to load config")?;
    tracing::info!("starting IntelliPark backend on port {}", config.server.port);

    let repo = RtdbClient::new(&config.firebase.database_url, config.firebase.auth_token.clone())
        .context("failed to build database client")?;
    let gateway = XenditClient::new(&config.xendit, &config.frontend)
        .map_err(|e| anyhow::anyhow!("failed to build payment gateway client: {e}"))?;

    let engine = LifecycleEngine::new(
        Arc::new(repo),
        Arc::new(gateway),
        Arc::new(InMemoryStaging::new()),
        config.tariffs,
    );

    let state = AppState {
        engine: Arc::new(engine),
    };
    let router = app(state, &config.cors.allowed_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
