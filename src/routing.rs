//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    dashboard::{
        get_dashboard_content, get_dashboard_page, get_export, get_filter_panel, get_revenue_page,
        get_transactions_grid, post_clear_filter, post_filter, post_filter_dates,
        post_filter_preset, post_retry,
    },
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::REVENUE_VIEW, get(get_revenue_page))
        .route(endpoints::DASHBOARD_EXPORT, get(get_export))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // These routes serve fragments that htmx swaps into the dashboard.
    let fragment_routes = Router::new()
        .route(endpoints::DASHBOARD_CONTENT, get(get_dashboard_content))
        .route(endpoints::DASHBOARD_RETRY, post(post_retry))
        .route(endpoints::DASHBOARD_TRANSACTIONS, get(get_transactions_grid))
        .route(
            endpoints::DASHBOARD_FILTER,
            get(get_filter_panel).post(post_filter),
        )
        .route(endpoints::DASHBOARD_FILTER_CLEAR, post(post_clear_filter))
        .route(endpoints::DASHBOARD_FILTER_PRESET, post(post_filter_preset))
        .route(endpoints::DASHBOARD_FILTER_DATES, post(post_filter_dates));

    page_routes
        .merge(fragment_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
