use learning_log::{AppState, Config, NoteSource, load_preferences, router};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let source = NoteSource::from_config(&config)?;
    let prefs = load_preferences(&config.prefs_path).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(
        "serving {} note dates from {:?}",
        config.dates.len(),
        config.notes
    );
    let app = router(AppState::new(config, source, prefs));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
