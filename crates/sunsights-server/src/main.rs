//! Sunsights Server
//!
//! Customer feedback sentiment, emotion and priority analysis over HTTP.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

use sunsights_server::{create_router, AppState, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "sunsights-server")]
#[command(about = "Sunsights feedback analysis API", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SUNSIGHTS_CONFIG", default_value = "config.yaml")]
    config: String,

    /// Listen address
    #[arg(short = 'l', long, env = "SUNSIGHTS_LISTEN")]
    listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "SUNSIGHTS_PORT")]
    port: Option<u16>,

    /// Analytics data file
    #[arg(long, env = "SUNSIGHTS_ANALYTICS_PATH")]
    analytics_path: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting Sunsights server");

    let mut config = ServerConfig::load(&cli.config)?;
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(path) = cli.analytics_path {
        config.analytics_path = path.into();
    }
    info!(
        sentiment = %config.classifiers.sentiment.name,
        emotion = %config.classifiers.emotion.name,
        timeout_ms = config.classifiers.timeout_ms,
        "Configuration loaded"
    );

    let metrics_handle = init_metrics()?;

    // Loads (and on first run downloads) the classifier models
    let state = AppState::new(config.clone(), Some(metrics_handle)).await?;

    let addr: SocketAddr = format!("{}:{}", config.listen, config.port).parse()?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Sunsights listening on http://{}", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
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
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("sunsights=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sunsights=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    sunsights_telemetry::metrics::describe_metrics();

    info!("Metrics exporter initialized");
    Ok(handle)
}
