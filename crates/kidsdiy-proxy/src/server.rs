// Server lifecycle: bind, serve, and stop on Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use kidsdiy_api::ProxyRoute;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tracing::{info, warn};

use crate::error::ServeError;
use crate::routes::{AppState, router};

/// Serve the proxy on `addr` until a shutdown signal arrives.
pub async fn serve(addr: SocketAddr, route: ProxyRoute) -> Result<(), ServeError> {
    info!(upstream = %route.client().base_url(), policy = ?route.policy(), "starting proxy");
    let app = router(AppState::new(route));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;
    info!("proxy listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("proxy stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
