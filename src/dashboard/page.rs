//! The dashboard page shell and the bodies swapped into it.

use maud::{Markup, html};
use time_tz::Tz;

use crate::{
    chart::{ECHARTS_SCRIPT_URL, revenue_chart_view},
    dashboard::{
        cards::{balance_card, wallet_cards},
        view_state::DashboardView,
    },
    endpoints,
    grid::{GridRows, transactions_grid},
    html::{BUTTON_PRIMARY_STYLE, HeadElement, PAGE_CONTAINER_STYLE, SKELETON_STYLE, base},
    navigation::{NavBar, user_avatar_oob},
    store::StoreSnapshot,
};

/// The id of the element the dashboard bodies are swapped into.
pub const DASHBOARD_CONTENT_ID: &str = "dashboard-content";

/// The full page for `active_endpoint` with a loading body.
///
/// The loading body fetches the real body as soon as it is shown.
pub fn dashboard_page(active_endpoint: &str, timezone: &Tz) -> Markup {
    let nav_bar = NavBar::new(active_endpoint).into_html();

    let content = html!(
        (nav_bar)

        main id=(DASHBOARD_CONTENT_ID) class=(PAGE_CONTAINER_STYLE)
        {
            (loading_content(timezone))
        }
    );

    base(
        "Dashboard",
        &[HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned())],
        &content,
    )
}

/// Placeholders for every section, plus a trigger that asks for the body again.
pub fn loading_content(timezone: &Tz) -> Markup {
    html!(
        div
            hx-get=(endpoints::DASHBOARD_CONTENT)
            hx-trigger="load"
            hx-target={ "#" (DASHBOARD_CONTENT_ID) }
            hx-swap="innerHTML"
            data-loading="true"
        {}

        div class="flex flex-col lg:flex-row gap-12"
        {
            div class="flex flex-col flex-1 gap-8"
            {
                (balance_card(None))
                div class={ "w-full min-h-[300px] " (SKELETON_STYLE) } {}
            }

            (wallet_cards(None))
        }

        (transactions_grid(GridRows::Loading, None, timezone))
    )
}

/// The error panel that replaces the whole body when any resource fails to load.
pub fn error_content(message: &str) -> Markup {
    html!(
        div
            id="dashboard-error"
            class="flex flex-col items-center gap-4 py-24 text-center"
            role="alert"
        {
            h2 class="text-2xl font-bold" { "Error Loading Dashboard" }

            p class="text-gray-500 dark:text-gray-400" { (message) }

            button
                type="button"
                class=(BUTTON_PRIMARY_STYLE)
                hx-post=(endpoints::DASHBOARD_RETRY)
                hx-target={ "#" (DASHBOARD_CONTENT_ID) }
                hx-swap="innerHTML"
            {
                "Retry"
            }
        }
    )
}

/// The loaded dashboard: balance, revenue chart, wallet totals and the grid.
///
/// The chart always plots the full snapshot, the grid shows `view`'s rows.
pub fn ready_content(snapshot: &StoreSnapshot, view: &DashboardView, timezone: &Tz) -> Markup {
    let wallet = snapshot.wallet.data().as_ref();
    let rows = view.displayed_rows();

    html!(
        @if let Some(user) = snapshot.user.data() {
            (user_avatar_oob(user))
        }

        div class="flex flex-col lg:flex-row gap-12"
        {
            div class="flex flex-col flex-1 gap-8"
            {
                (balance_card(wallet))
                (revenue_chart_view(snapshot.transactions.data(), timezone))
            }

            (wallet_cards(wallet))
        }

        div id="filter-panel" {}

        (transactions_grid(GridRows::Ready(&rows), view.sort(), timezone))
    )
}
