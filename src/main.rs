use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chefbot::{
    api::{self, AppState},
    config::AppConfig,
    db::DBLayer,
    inference::{GeminiTransport, ModelTransport},
    RecipePipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // -----------------------------
    // Shared state / Dependencies
    // -----------------------------
    let db = Arc::new(DBLayer::new(&config.db_path)?);

    let transport = Arc::new(GeminiTransport::new(config.gemini.clone()));
    if !transport.is_configured() {
        warn!("GEMINI_API_KEY is not set; recipe generation requests will fail");
    }
    let pipeline = RecipePipeline::new(transport, &config.generation);

    let state = AppState::new(db, pipeline, &config.jwt_secret);
    let app = api::router(state);

    info!(
        addr = %config.bind_addr,
        db_path = %config.db_path,
        model = %config.gemini.model,
        "🍳 recipe server listening"
    );

    let listener = TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
