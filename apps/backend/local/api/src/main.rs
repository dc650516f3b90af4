#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use legendex_api::{construct_router, state::State};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Legendex API");

    let config = config::Config::from_env()?;
    if config.uses_default_secret() {
        tracing::warn!("SECRET_KEY not set, flash cookies are signed with the default key");
    }

    let adapter = legendex_model::load_adapter(&config.model_path).inspect_err(|err| {
        tracing::error!(path = %config.model_path.display(), "Failed to load model: {err}");
    })?;
    tracing::info!(
        model = %adapter.model_kind(),
        features = adapter.schema().len(),
        probabilities = adapter.capabilities().predict_proba,
        importances = adapter.capabilities().feature_importances.is_some(),
        "Loaded model"
    );

    let state = Arc::new(State::new(adapter, &config.secret_key, &config.static_dir)?);
    let app = construct_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    legendex_api::axum::serve(listener, app).await?;

    Ok(())
}
