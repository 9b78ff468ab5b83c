//! pushrelay server binary entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use pushrelay_common::config::AppConfig;
use pushrelay_notifier::WebPushTransport;

use pushrelay_api::routes::create_app;
use pushrelay_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; LOG_FORMAT=json switches to structured output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "pushrelay_api=debug,pushrelay_notifier=debug,pushrelay_store=info,tower_http=debug",
        )
    });
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!("Starting pushrelay server...");

    // Load configuration; missing VAPID keys are fatal
    let config = AppConfig::from_env()?;

    // Push transport (validates the VAPID private key)
    let transport = Arc::new(WebPushTransport::new(&config)?);

    // Open subscription store and push log
    let state = AppState::open(config.clone(), transport).await?;
    tracing::info!(data_dir = %config.data_dir.display(), "Data files ready");

    // Build router with CORS, body limit, panic catcher and request tracing
    let app = create_app(state)?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let key_prefix: String = config.vapid_public_key.chars().take(20).collect();
    tracing::info!(public_key = %key_prefix, "Push server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("pushrelay server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal, stopping gracefully...");
}
