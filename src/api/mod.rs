//! REST API for simulation state and telemetry.
//!
//! Provides two GET endpoints:
//! - `/state` — simulation settings, disaster report, and latest tick
//! - `/timeline` — full tick records with optional range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::config::SimulationSettings;
use crate::disaster::{DisasterReport, TickRecord};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the simulation run completes and wrapped in
/// `Arc` — no locks needed since all data is read-only.
pub struct AppState {
    /// Simulation settings used for this run.
    pub settings: SimulationSettings,
    /// Aggregate disaster report.
    pub report: DisasterReport,
    /// Per-second tick records.
    pub records: Vec<TickRecord>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/timeline", get(handlers::get_timeline))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
