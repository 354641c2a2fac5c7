//! The endpoint URIs served by the dashboard.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard page.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The revenue page, an alias for the dashboard page.
pub const REVENUE_VIEW: &str = "/revenue";
/// The dashboard body: cards, chart and transactions, or the loading and
/// error states.
pub const DASHBOARD_CONTENT: &str = "/dashboard/content";
/// The route that re-requests the user, wallet and transactions.
pub const DASHBOARD_RETRY: &str = "/dashboard/retry";
/// The transactions grid, optionally sorted.
pub const DASHBOARD_TRANSACTIONS: &str = "/dashboard/transactions";
/// The filter panel (GET) and applying a filter (POST).
pub const DASHBOARD_FILTER: &str = "/dashboard/filter";
/// The route for clearing the active filter.
pub const DASHBOARD_FILTER_CLEAR: &str = "/dashboard/filter/clear";
/// The route for resolving a date preset into concrete dates.
pub const DASHBOARD_FILTER_PRESET: &str = "/dashboard/filter/preset";
/// The route for recording a manually picked date.
pub const DASHBOARD_FILTER_DATES: &str = "/dashboard/filter/dates";
/// The CSV download of the displayed transactions.
pub const DASHBOARD_EXPORT: &str = "/dashboard/export";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
