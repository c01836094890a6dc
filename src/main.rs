use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_rec_api::{
    config::Config,
    dataset::{Dataset, FileArtifactSource},
    routes::{create_router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let source = FileArtifactSource::new(&config.movies_path, &config.similarity_path);

    tracing::info!(
        cwd = ?std::env::current_dir().ok(),
        movies_path = %source.movies_path().display(),
        similarity_path = %source.similarity_path().display(),
        "Starting movie recommendation service"
    );

    let dataset = Dataset::load(&source).context("Failed to load recommendation dataset")?;

    let state = Arc::new(AppState::new(dataset, config.poster_url.clone()));
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app).await?;

    Ok(())
}
