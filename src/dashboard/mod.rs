//! Dashboard module
//!
//! Ties the store, the filter engine and the grid together: decides whether
//! the dashboard is loading, failed or ready, keeps track of the rows shown
//! in the grid and serves the page and its htmx fragments.

mod cards;
mod filter_panel;
mod handlers;
mod page;
mod view_state;

pub use handlers::{
    DashboardState, get_dashboard_content, get_dashboard_page, get_export, get_filter_panel,
    get_revenue_page, get_transactions_grid, post_clear_filter, post_filter, post_filter_dates,
    post_filter_preset, post_retry,
};
pub use view_state::DashboardView;
