use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    common::utils::logging::init_logging_default();
}

fn main() -> std::process::ExitCode {
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // capture panics into the structured log before the process dies
    std::panic::set_hook(Box::new({
        let service_id = service_id;
        move |info| {
            error!(
                service = "product-service",
                event = "panic",
                %service_id,
                pid,
                message = %info,
                "unhandled panic occurred"
            );
        }
    }));

    // thread count comes from config.toml, falling back to TOKIO_WORKER_THREADS
    let worker_threads = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg.server.worker_threads,
        Err(_) => std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()),
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(
                service = "product-service",
                event = "runtime_build_failed",
                error = %e,
                "failed to build tokio runtime"
            );
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "product-service",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "product service starting"
    );

    // the lifecycle coordinator inside run() owns the termination signal;
    // a startup failure is the only non-zero exit
    rt.block_on(async move {
        match server::startup::run().await {
            Ok(()) => {
                info!(
                    service = "product-service",
                    event = "stop",
                    %service_id,
                    pid,
                    "product service stopped"
                );
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(
                    service = "product-service",
                    event = "startup_failed",
                    error = %e,
                    "product service failed to start"
                );
                std::process::ExitCode::FAILURE
            }
        }
    })
}
