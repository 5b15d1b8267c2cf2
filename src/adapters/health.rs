//! Health Check Server - Liveness and Readiness Probes
//!
//! Exposes /live and /ready endpoints via axum 0.7 for Docker health
//! checks and monitoring. Readiness flips to 503 once graceful shutdown
//! begins so orchestrators stop routing to the process.

use anyhow::Result;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use tokio::sync::watch;
use tracing::info;

/// Serve health endpoints until the process exits.
///
/// - `/live`  — Liveness probe: 200 if the process is running
/// - `/ready` — Readiness probe: 503 during graceful shutdown
pub async fn serve_health(port: u16, ready_rx: watch::Receiver<bool>) -> Result<()> {
    let app = Router::new()
        .route("/live", get(|| async { StatusCode::OK }))
        .route(
            "/ready",
            get(
                move |State(rx): State<watch::Receiver<bool>>| async move {
                    if *rx.borrow() {
                        StatusCode::OK
                    } else {
                        StatusCode::SERVICE_UNAVAILABLE
                    }
                },
            ),
        )
        .with_state(ready_rx);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "Health server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
