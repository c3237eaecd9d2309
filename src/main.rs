//! Server: reads settings, prepares the database and full-text index, serves the API.

use chinook_api::{app, connect, init_db, AppState, ResolvedModel, Settings};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let model = ResolvedModel::chinook()?;
    let pool = connect(&settings).await?;
    init_db(&pool, &model).await?;
    let state = AppState::new(pool.clone(), model);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!(database = %settings.database_url, "listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state, settings.body_limit))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
