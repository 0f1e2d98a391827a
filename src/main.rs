use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use weather_rag_agent::core::config::AppPaths;
use weather_rag_agent::core::logging;
use weather_rag_agent::server;
use weather_rag_agent::{Agent, AgentServices, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("Invalid configuration")?;
    let paths = AppPaths::new(&settings);
    logging::init(paths.log_dir.as_deref());

    tracing::info!("Loaded settings: {}", settings.redacted());

    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);

    let services = AgentServices::initialize(settings, &paths)
        .await
        .context("Failed to initialize services")?;
    let agent = Agent::new(Arc::new(services)).context("Failed to build agent graph")?;

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;
    tracing::info!("Listening on {}", addr);

    let app: Router = server::router(Arc::new(agent));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", err);
    }
    tracing::info!("Shutting down");
}
