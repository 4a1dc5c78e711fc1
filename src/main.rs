use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use translate_backend::{
    build_app, logging,
    stats::{StatsHandle, StatsStore},
    translate::GoogleTranslator,
    AppState, Config,
};

const FORCED_SHUTDOWN_AFTER: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    let _log_guard = logging::init(&config)?;
    logging::install_panic_hook();

    if let Err(e) = run(config).await {
        error!("Server terminated: {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;

    let translator = GoogleTranslator::new(&config.translate_api_url, config.translate_timeout())
        .context("Failed to create translation client")?;

    let (stats, stats_writer) = StatsHandle::spawn(StatsStore::new(config.stats_path()));
    info!("Recording stats in {}", config.stats_file);

    let environment = config.node_env.clone();
    let state = AppState::new(config, Arc::new(translator), stats);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(
        environment = %environment,
        version = env!("CARGO_PKG_VERSION"),
        "Server started on {}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    info!("HTTP server closed");

    // The router (and every StatsHandle it held) is gone; wait for the queue to drain.
    stats_writer.await.context("Stats writer task failed")?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    };
    info!("{} received. Shutting down gracefully...", signal);

    tokio::spawn(async {
        tokio::time::sleep(FORCED_SHUTDOWN_AFTER).await;
        error!("Forcing shutdown due to timeout");
        std::process::exit(1);
    });
}
