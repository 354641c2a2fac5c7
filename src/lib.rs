//! Revenue Dashboard is a web app for keeping an eye on a store's earnings.
//!
//! This library serves HTML pages for a dashboard that reads the user, their
//! wallet and their transactions from a REST payments API. Transactions can
//! be filtered, sorted and exported as CSV.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod chart;
mod config;
mod dashboard;
mod endpoints;
mod error;
mod filter;
mod gateway;
mod grid;
mod html;
mod internal_server_error;
mod logging;
mod models;
mod navigation;
mod not_found;
mod routing;
mod store;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use config::{DEFAULT_SETTLE_TIMEOUT, DashboardConfig};
pub use error::Error;
pub use gateway::{DataGateway, GatewayError, RestGateway};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use store::{DashboardStore, Slice, StoreSnapshot};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
