use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use itinerary_server::config::{AppConfig, ConfigError};
use itinerary_server::ingest::{Cancellation, IngestJob, WorkerPool, source_files};
use itinerary_server::store::{ItineraryStore, MemoryStore};
use itinerary_server::web::{AppState, create_router};

/// Anything that stops the server from starting or serving.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to list source files in {}: {source}", dir.display())]
    Sources { dir: PathBuf, source: io::Error },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&AppConfig::default().log_filter);
            return Err(e.into());
        }
    };
    init_tracing(&config.log_filter);

    let sources = source_files(&config.fixtures_dir).map_err(|source| StartupError::Sources {
        dir: config.fixtures_dir.clone(),
        source,
    })?;
    info!(
        dir = %config.fixtures_dir.display(),
        files = sources.len(),
        workers = config.workers,
        "Loading itineraries"
    );

    let memory = Arc::new(MemoryStore::new());
    let store: Arc<dyn ItineraryStore> = memory.clone();
    let cancel = Cancellation::new();
    let pool = Arc::new(WorkerPool::spawn(config.workers));

    // Loading runs alongside the server.
    let loader = {
        let pool = Arc::clone(&pool);
        let cancel = cancel.clone();
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            for path in sources {
                let job = IngestJob::new(cancel.clone(), path, Arc::clone(&store));
                if let Err(e) = pool.submit(job).await {
                    warn!(error = %e, "Stopped submitting source files");
                    break;
                }
            }
            pool.drain().await;
            info!(
                itineraries = memory.len(),
                routes = memory.route_count(),
                "Finished loading itineraries"
            );
        })
    };

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    info!(%addr, "Itinerary server listening");

    let app = create_router(AppState::new(store));
    let shutdown = {
        let cancel = cancel.clone();
        async move { cancel.cancelled().await }
    };
    tokio::spawn(watch_signals(cancel.clone()));

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(StartupError::Serve);

    // Stop loading as well, whichever way the server ended.
    cancel.cancel();
    pool.drain().await;
    if let Err(e) = loader.await {
        warn!(error = %e, "Loader task failed");
    }
    info!("Itinerary server stopped");

    served
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Cancel on Ctrl-C, or SIGTERM on unix.
async fn watch_signals(cancel: Cancellation) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
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
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = cancel.cancelled() => return,
    }

    info!("Shutdown signal received");
    cancel.cancel();
}
