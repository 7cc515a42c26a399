use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelforge_server::api;
use reelforge_server::config::Config;
use reelforge_server::engine::Engine;
use reelforge_server::engine::stages::StageSet;
use reelforge_server::store::JobStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelforge_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Reelforge Server...");

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;
    info!(
        "Loaded configuration: bind_addr={}, output_dir={}",
        config.bind_addr,
        config.output_dir.display()
    );

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("creating output dir {}", config.output_dir.display()))?;

    // Shared job store
    let store = Arc::new(JobStore::new());

    // Start the engine with the local stage executors
    let stages = StageSet::local(&config.output_dir);
    let engine = Engine::new(config.clone(), Arc::clone(&store), stages);
    tokio::spawn(async move { engine.run().await });

    info!("Job engine started");

    // Build router with all API endpoints
    let app = api::create_router(store);

    info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding to {}", config.bind_addr))?;

    axum::serve(listener, app).await.context("serving HTTP")?;

    Ok(())
}
