use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use service::product_service::ProductService;
use service::storage::{JsonProductStore, ProductStore};

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

/// Initialize logging via shared common utils
fn init_logging() {
    common::utils::logging::init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: establish storage, build the app, then serve until a
/// termination signal arrives and the drain sequence finishes. A failure
/// before the listener is up is fatal; nothing is served.
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    init_logging();

    let cfg = configs::AppConfig::load_or_default()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let store = JsonProductStore::open(&cfg.storage.path)
        .await
        .map_err(|e| StartupError::Storage(e.to_string()))?;

    let state = ServerState {
        products: Arc::new(ProductService::new(store.clone() as Arc<dyn ProductStore>)),
    };
    let app = routes::build_router(
        state,
        build_cors(),
        Duration::from_secs(cfg.server.read_timeout_secs),
    );

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e: std::net::AddrParseError| StartupError::InvalidConfig(e.to_string()))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    info!(%addr, event = "serving", "product service listening");

    serve_with_shutdown(
        listener,
        app,
        store,
        shutdown_signal(),
        Duration::from_secs(cfg.server.shutdown_timeout_secs),
    )
    .await;
    Ok(())
}

/// Drive the serving/draining/stopped sequence. The listener runs on a
/// background task while this future awaits the injected termination signal.
/// On signal: storage is closed first, then the listener is asked to shut
/// down gracefully, bounded by the drain deadline. In-flight requests may
/// finish until the deadline; shutdown errors are logged once each and never
/// escalate.
pub async fn serve_with_shutdown(
    listener: TcpListener,
    app: Router,
    store: Arc<dyn ProductStore>,
    signal: impl Future<Output = ()> + Send + 'static,
    drain_deadline: Duration,
) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    signal.await;
    info!(event = "draining", "received terminate, beginning graceful shutdown");

    // storage first, then the listener
    if let Err(e) = store.close().await {
        error!(err = %e, "storage close failed during drain");
    }
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(drain_deadline, server).await {
        Ok(Ok(Ok(()))) => info!(event = "stopped", "listener drained"),
        Ok(Ok(Err(e))) => error!(err = %e, "listener shutdown error"),
        Ok(Err(e)) => error!(err = %e, "server task join error"),
        Err(_) => warn!(
            deadline_secs = drain_deadline.as_secs(),
            "drain deadline elapsed before the listener stopped; exiting anyway"
        ),
    }
}

/// The single process-wide termination subscription, owned by the lifecycle
/// coordinator.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(err = %e, "failed to listen for shutdown signal");
    }
}
