mod conf;
mod error;
mod handler;
mod seed;
mod state;

pub use conf::Config;
pub use error::GatewayError;
pub use handler::{ACCOUNT_HEADER, DEFAULT_ACCOUNT, build_router};
pub use seed::Seed;
pub use state::GatewayState;

use s3gw_observability::{TracingConfig, setup_tracing};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn start_server(
    config: Config,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let tracing_config =
        TracingConfig::new("s3gw-gateway", &config.log_level, false)
            .with_format(config.log_format.as_deref());
    if let Err(e) = setup_tracing(tracing_config) {
        eprintln!("Failed to initialize tracing: {e}");
    }

    let shutdown = CancellationToken::new();
    let state = GatewayState::new(config.listing_config()?, shutdown.clone());
    if let Some(path) = &config.seed_file {
        Seed::load(path).await?.apply(&state).await?;
        info!(seed_file = %path, "loaded seed catalog");
    }

    let router = build_router(state);
    let listener =
        TcpListener::bind(format!("0.0.0.0:{}", config.http_port)).await?;
    info!("start server on port {:?}", config.http_port);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;
    info!("server stopped");
    Ok(())
}

/// Wait for Ctrl-C or SIGTERM, then cancel `shutdown` so in-flight listings
/// answer with ServiceUnavailable while axum drains connections.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
    shutdown.cancel();
}
