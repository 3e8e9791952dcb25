use anyhow::Context;

use shelf_api::AppConfig;
use shelf_api::config::load_dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` first, so logging sees RUST_LOG/LOG_FORMAT from it.
    let dotenv = load_dotenv();
    shelf_observability::init();
    if let Some(path) = dotenv {
        tracing::info!(path = %path.display(), "loaded .env");
    }

    let config = AppConfig::from_env().context("invalid configuration")?;
    let app = shelf_api::app::build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

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
