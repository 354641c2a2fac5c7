//! Implements a struct that holds the state of the dashboard server.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{
    config::DashboardConfig,
    dashboard::DashboardView,
    gateway::{DataGateway, RestGateway},
    store::DashboardStore,
};

/// The state of the dashboard server.
#[derive(Clone)]
pub struct AppState {
    /// The data fetched from the payments API.
    pub store: DashboardStore,

    /// The rows, filter and sort currently shown in the transactions grid.
    pub view: Arc<Mutex<DashboardView>>,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// How long a request for the dashboard body waits for in-flight requests.
    pub settle_timeout: Duration,
}

impl AppState {
    /// Create a new [AppState] that reads from the payments API in `config`.
    pub fn new(config: &DashboardConfig) -> Self {
        let gateway = RestGateway::new(config.api_base_url.clone());

        Self::with_gateway(
            Arc::new(gateway),
            &config.local_timezone,
            config.settle_timeout,
        )
    }

    /// Create a new [AppState] that reads from `gateway`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    pub fn with_gateway(
        gateway: Arc<dyn DataGateway>,
        local_timezone: &str,
        settle_timeout: Duration,
    ) -> Self {
        Self {
            store: DashboardStore::new(gateway),
            view: Arc::new(Mutex::new(DashboardView::default())),
            local_timezone: local_timezone.to_owned(),
            settle_timeout,
        }
    }
}
