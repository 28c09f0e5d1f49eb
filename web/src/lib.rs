//! HTTP surface of the infocenter broker.
//!
//! Routes `POST /infocenter/:topic` to the publish controller and
//! `GET /infocenter/:topic` to the event stream handler, both backed by the
//! `Broker` carried in `AppState`.

use log::*;
use sse::Broker;
use tokio::net::TcpListener;

pub use service::AppState;

mod controller;
pub mod error;
pub mod router;
mod stream;

/// Binds the configured address and serves until Ctrl-C, then drains the broker
/// so open event streams end and the graceful shutdown can complete.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let address = app_state.config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Server listening on {address}");

    let broker = app_state.broker.clone();
    axum::serve(listener, router::define_routes(app_state))
        .with_graceful_shutdown(shutdown_signal(broker))
        .await
}

async fn shutdown_signal(broker: Broker) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }

    info!("Shutdown signal received, closing event streams");
    broker.shutdown().await;
}
