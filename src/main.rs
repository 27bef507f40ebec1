//! Faceverify HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use faceverify::config::Config;
use faceverify::detector::RemoteFaceDetector;
use faceverify::gateway::{AppState, create_router};
use faceverify::pipeline::VerificationPipeline;
use faceverify::storage::LocalImageStore;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        upload_dir = %config.upload_dir.display(),
        threshold = config.same_person_threshold,
        "Faceverify starting"
    );

    let detector_config = config
        .detector_config()
        .context("FACEVERIFY_DETECTOR_URL is not set")?;
    let detector = RemoteFaceDetector::new(detector_config)?;
    tracing::info!(url = detector.url(), "Face detector configured");

    let pipeline = VerificationPipeline::new(Arc::new(detector), config.pipeline_config());

    let store = LocalImageStore::new(config.upload_dir.clone());
    store.ensure_root()?;

    if config.api_key.is_none() {
        tracing::warn!("No FACEVERIFY_API_KEY configured, endpoints are unauthenticated");
    }

    let state = AppState::new(pipeline, Arc::new(store))
        .with_api_key(config.api_key.clone())
        .with_decode_limits(config.decode_limits())
        .with_cors_origins(config.cors_origins.clone());

    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Faceverify shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("FACEVERIFY_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8000);

    let url = format!("http://127.0.0.1:{}/api/health", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
