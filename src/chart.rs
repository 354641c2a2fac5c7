//! The revenue line chart.
//!
//! The chart is configured with charming and drawn by ECharts in the browser.
//! The initialisation script is rendered inline next to its container so that
//! the chart is drawn when the dashboard body is swapped in by htmx.

use charming::{
    Chart,
    component::{Axis, Grid},
    element::{AxisType, ItemStyle, JsFunction, LineStyle, Tooltip, Trigger},
    series::Line,
};
use maud::{Markup, PreEscaped, html};
use time_tz::Tz;

use crate::{grid::month_abbrev, models::Transaction, timezone::local_date};

/// The HTML element ID of the chart container.
pub const REVENUE_CHART_ID: &str = "revenue-chart";

/// The brand orange used for the revenue line.
const LINE_COLOUR: &str = "#FF6B35";

/// The URL of the ECharts library the chart needs.
pub const ECHARTS_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// One point per transaction, in snapshot order, labelled like "Apr 1".
fn chart_points(transactions: &[Transaction], timezone: &Tz) -> (Vec<String>, Vec<f64>) {
    transactions
        .iter()
        .map(|transaction| {
            let label = match transaction.timestamp() {
                Some(timestamp) => {
                    let date = local_date(timestamp, timezone);
                    format!("{} {}", month_abbrev(date.month()), date.day())
                }
                None => transaction.date.clone(),
            };

            (label, transaction.amount)
        })
        .unzip()
}

/// The ECharts configuration for the revenue chart.
pub fn revenue_chart(transactions: &[Transaction], timezone: &Tz) -> Chart {
    let (labels, values) = chart_points(transactions, timezone);

    Chart::new()
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter()),
        )
        .grid(
            Grid::new()
                .left("2%")
                .right("2%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .boundary_gap(false)
                .data(labels),
        )
        .y_axis(Axis::new().type_(AxisType::Value).show(false))
        .series(
            Line::new()
                .name("Revenue")
                .smooth(true)
                .show_symbol(false)
                .line_style(LineStyle::new().width(3).color(LINE_COLOUR))
                .item_style(ItemStyle::new().color(LINE_COLOUR))
                .data(values),
        )
}

fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// The chart container and the script that draws the chart into it.
///
/// Renders an empty-state message instead when there are no transactions.
pub fn revenue_chart_view(transactions: &[Transaction], timezone: &Tz) -> Markup {
    if transactions.is_empty() {
        return html! {
            div
                id=(REVENUE_CHART_ID)
                data-empty-state="true"
                class="flex items-center justify-center min-h-[300px] text-gray-500 dark:text-gray-400"
            {
                "No revenue to show yet"
            }
        };
    }

    let options = escape_for_script(&revenue_chart(transactions, timezone).to_string());
    let script = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{REVENUE_CHART_ID}");
            const existing = echarts.getInstanceByDom(chartDom);
            if (existing) {{
                existing.dispose();
            }}
            const chart = echarts.init(chartDom);
            chart.setOption({options});

            window.addEventListener('resize', chart.resize);
        }})();"#
    );

    html! {
        div id=(REVENUE_CHART_ID) class="w-full min-h-[300px]" {}
        script { (PreEscaped(script)) }
    }
}

/// Escape the characters that could end a `<script>` element early.
///
/// Labels can hold text sent by the API. The escapes are only valid inside
/// string literals, which is the only place these characters appear in the
/// chart options.
fn escape_for_script(options: &str) -> String {
    options
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
