use homepage_api::{logging, routes, AppState, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env();
    logging::init();

    for (upstream, status) in [
        ("racknerd", settings.racknerd.as_ref().err()),
        ("manyfold", settings.manyfold.as_ref().err()),
        ("bookstack", settings.bookstack.as_ref().err()),
    ] {
        match status {
            None => tracing::info!(upstream, "Upstream configured"),
            Some(err) => tracing::warn!(upstream, error = %err, "Upstream not configured, route will return 500"),
        }
    }

    let addr = settings.socket_addr();
    tracing::info!(
        cache_ttl_secs = settings.cache_ttl.as_secs(),
        request_timeout_secs = settings.request_timeout.as_secs(),
        cache_errors = settings.cache_errors,
        "Configuration loaded"
    );

    let state = AppState::new(settings)?.shared();
    let (addr, server) =
        warp::serve(routes(state)).try_bind_with_graceful_shutdown(addr, shutdown_signal())?;

    tracing::info!(%addr, "Starting Homepage API server on port {}", addr.port());
    server.await;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
