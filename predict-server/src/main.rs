//! Bug Assignee Prediction Server
//!
//! Loads the trained artifacts once at startup and serves
//! `POST /predict-assignee`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use model_service::{ArtifactPaths, Predictor};
use predict_server::{config::Config, create_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "predict_server=debug,model_service=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Bug Assignee Predictor starting...");
    tracing::info!("Artifacts: {}", config.artifact_dir.display());

    // Load model artifacts
    let predictor = Predictor::load(&ArtifactPaths::new(&config.artifact_dir))
        .with_context(|| format!("failed to load artifacts from {}", config.artifact_dir.display()))?;

    // Build application state
    let state = AppState {
        predictor: Arc::new(predictor),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
