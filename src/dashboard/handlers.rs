//! Dashboard HTTP handlers.
//!
//! The page handlers mount the dashboard and the remaining handlers serve the
//! htmx fragments swapped into it. Fragment handlers report failures as alerts.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use axum_htmx::{HxRequest, HxTriggerName};
use maud::{Markup, html};
use time::OffsetDateTime;
use time_tz::Tz;

use crate::{
    AppState, Error,
    dashboard::{
        filter_panel::{
            FilterForm, PresetQuery, close_filter_panel, filter_panel, transaction_types,
        },
        page::{dashboard_page, error_content, loading_content, ready_content},
        view_state::{DashboardStatus, DashboardView},
    },
    endpoints,
    filter::DateRange,
    grid::{CsvDownload, GridRows, SortQuery, transactions_grid, transactions_to_csv},
    store::{DashboardStore, StoreSnapshot},
    timezone::get_timezone,
};

/// The state needed for serving the dashboard.
#[derive(Clone)]
pub struct DashboardState {
    /// The store holding the data fetched from the payments API.
    pub store: DashboardStore,
    /// The rows, filter and sort currently shown in the grid.
    pub view: Arc<Mutex<DashboardView>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// How long to wait for in-flight requests before rendering the dashboard body.
    pub settle_timeout: Duration,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            view: state.view.clone(),
            local_timezone: state.local_timezone.clone(),
            settle_timeout: state.settle_timeout,
        }
    }
}

/// Display the dashboard and start loading its data.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Markup, Error> {
    mount(&state, endpoints::DASHBOARD_VIEW)
}

/// Display the dashboard under the revenue tab and start loading its data.
pub async fn get_revenue_page(State(state): State<DashboardState>) -> Result<Markup, Error> {
    mount(&state, endpoints::REVENUE_VIEW)
}

fn mount(state: &DashboardState, active_endpoint: &str) -> Result<Markup, Error> {
    let timezone = get_timezone(&state.local_timezone)?;

    state.store.spawn_fetch_all();

    Ok(dashboard_page(active_endpoint, timezone))
}

/// The dashboard body for the store's current state: loading, error or ready.
///
/// Waits up to the settle timeout for in-flight requests first.
pub async fn get_dashboard_content(State(state): State<DashboardState>) -> Response {
    match dashboard_content(&state).await {
        Ok(content) => content.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

async fn dashboard_content(state: &DashboardState) -> Result<Markup, Error> {
    let timezone = get_timezone(&state.local_timezone)?;

    if state.store.snapshot().transactions.is_unloaded() {
        state.store.spawn_fetch_all();
    }

    let snapshot = state.store.wait_until_settled(state.settle_timeout).await;

    let content = match DashboardStatus::from_snapshot(&snapshot) {
        DashboardStatus::Loading => {
            tracing::debug!("dashboard still loading after {:?}", state.settle_timeout);
            loading_content(timezone)
        }
        DashboardStatus::Error(message) => error_content(&message),
        DashboardStatus::Ready => {
            let mut view = lock_view(&state.view)?;
            view.sync_with(&snapshot);
            ready_content(&snapshot, &view, timezone)
        }
    };

    Ok(content)
}

/// Re-issue all three requests and show the loading body.
pub async fn post_retry(State(state): State<DashboardState>) -> Response {
    let timezone = match get_timezone(&state.local_timezone) {
        Ok(timezone) => timezone,
        Err(error) => return error.into_alert_response(),
    };

    tracing::info!("retrying dashboard requests");
    state.store.spawn_fetch_all();

    loading_content(timezone).into_response()
}

/// The transactions grid sorted as requested.
///
/// Only htmx requests get the fragment, anything else is sent to the dashboard.
pub async fn get_transactions_grid(
    State(state): State<DashboardState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<SortQuery>,
) -> Response {
    if !is_htmx_request {
        return Redirect::to(endpoints::DASHBOARD_VIEW).into_response();
    }

    let markup = get_timezone(&state.local_timezone).and_then(|timezone| {
        with_view(&state, |view, snapshot| {
            view.set_sort(query.into_sort());
            grid(snapshot, view, timezone)
        })
    });

    match markup {
        Ok(markup) => markup.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// The filter panel, filled in from the last applied filter.
pub async fn get_filter_panel(State(state): State<DashboardState>) -> Response {
    let panel = get_timezone(&state.local_timezone).and_then(|timezone| {
        with_view(&state, |view, snapshot| {
            let form = view
                .filter()
                .map(|filter| FilterForm::from_spec(filter, timezone))
                .unwrap_or_default();

            filter_panel(&form, &transaction_types(snapshot.transactions.data()))
        })
    });

    match panel {
        Ok(panel) => panel.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Show only the transactions matching the submitted filter and close the panel.
pub async fn post_filter(
    State(state): State<DashboardState>,
    Form(form): Form<FilterForm>,
) -> Response {
    match apply_filter(&state, &form) {
        Ok(markup) => markup.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn apply_filter(state: &DashboardState, form: &FilterForm) -> Result<Markup, Error> {
    let timezone = get_timezone(&state.local_timezone)?;
    let filter = form
        .to_spec(timezone)
        .inspect_err(|error| tracing::debug!("rejected filter form {form:?}: {error}"))?;

    with_view(state, |view, snapshot| {
        view.apply_filter(filter, snapshot);

        html!(
            (grid(snapshot, view, timezone))
            (close_filter_panel())
        )
    })
}

/// Forget the applied filter, show every transaction and close the panel.
pub async fn post_clear_filter(State(state): State<DashboardState>) -> Response {
    let markup = get_timezone(&state.local_timezone).and_then(|timezone| {
        with_view(&state, |view, snapshot| {
            view.clear_filter(snapshot);

            html!(
                (grid(snapshot, view, timezone))
                (close_filter_panel())
            )
        })
    });

    match markup {
        Ok(markup) => markup.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Fill in the panel's dates from a preset, as seen now.
pub async fn post_filter_preset(
    State(state): State<DashboardState>,
    Query(PresetQuery { preset }): Query<PresetQuery>,
    Form(form): Form<FilterForm>,
) -> Response {
    let panel = get_timezone(&state.local_timezone).and_then(|timezone| {
        let mut filter = form.to_spec(timezone)?;
        let now = OffsetDateTime::now_utc();
        filter.date_range.apply_preset(preset, now, timezone);

        Ok(filter_panel(
            &FilterForm::from_spec(&filter, timezone),
            &transaction_types(state.store.snapshot().transactions.data()),
        ))
    });

    match panel {
        Ok(panel) => panel.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Record a date picked by hand, which clears any active preset.
///
/// The `HX-Trigger-Name` header says which of the two date inputs changed.
pub async fn post_filter_dates(
    State(state): State<DashboardState>,
    HxTriggerName(changed_input): HxTriggerName,
    Form(form): Form<FilterForm>,
) -> Response {
    let panel = get_timezone(&state.local_timezone).and_then(|timezone| {
        let mut filter = form.to_spec(timezone)?;
        let DateRange { from, to, .. } = filter.date_range;

        match changed_input.as_deref() {
            Some("to") => filter.date_range.select_to(to),
            _ => filter.date_range.select_from(from),
        }

        Ok(filter_panel(
            &FilterForm::from_spec(&filter, timezone),
            &transaction_types(state.store.snapshot().transactions.data()),
        ))
    });

    match panel {
        Ok(panel) => panel.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Download the displayed rows, in display order, as a CSV file.
pub async fn get_export(State(state): State<DashboardState>) -> Result<Response, Error> {
    let rows = with_view(&state, |view, _| view.displayed_rows())?;
    let csv = transactions_to_csv(&rows)?;

    tracing::info!("exporting {} transactions", rows.len());

    Ok(CsvDownload(csv).into_response())
}

fn lock_view(view: &Mutex<DashboardView>) -> Result<MutexGuard<'_, DashboardView>, Error> {
    view.lock()
        .inspect_err(|error| tracing::error!("could not acquire dashboard view lock: {error}"))
        .map_err(|_| Error::ViewLockError)
}

/// Run `f` on the view after bringing it up to date with the store.
fn with_view<T>(
    state: &DashboardState,
    f: impl FnOnce(&mut DashboardView, &StoreSnapshot) -> T,
) -> Result<T, Error> {
    let snapshot = state.store.snapshot();
    let mut view = lock_view(&state.view)?;
    view.sync_with(&snapshot);

    Ok(f(&mut view, &snapshot))
}

fn grid(snapshot: &StoreSnapshot, view: &DashboardView, timezone: &Tz) -> Markup {
    if snapshot.transactions.is_unloaded() {
        return transactions_grid(GridRows::Loading, view.sort(), timezone);
    }

    let rows = view.displayed_rows();
    transactions_grid(GridRows::Ready(&rows), view.sort(), timezone)
}
