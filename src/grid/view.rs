//! HTML rendering for the transactions grid.

use maud::{Markup, html};
use time_tz::Tz;

use crate::{
    endpoints,
    html::{
        BADGE_STYLE, BUTTON_SECONDARY_STYLE, SKELETON_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE,
    },
    models::Transaction,
};

use super::{
    columns::{
        RowSubtitle, format_short_date, format_transaction_amount, row_label, row_subtitle,
        status_badge_style, truncate_label,
    },
    sort::{Sort, SortColumn, SortOrder, next_sort},
};

/// The number of placeholder rows shown while transactions load.
pub const SKELETON_ROW_COUNT: usize = 5;

/// The sortable columns, in display order, with their header text.
const COLUMNS: [(SortColumn, &str); 3] = [
    (SortColumn::Type, "Transaction"),
    (SortColumn::Amount, "Amount"),
    (SortColumn::Date, "Date"),
];

/// What the grid body should show.
#[derive(Debug, Clone, Copy)]
pub enum GridRows<'a> {
    /// The transactions have not arrived yet.
    Loading,
    /// The rows to display, already filtered and sorted.
    Ready(&'a [Transaction]),
}

/// The transactions grid: a header with the row count and actions, followed by
/// a sortable table.
///
/// The grid replaces itself when a header is clicked, so it must be swapped
/// with `outerHTML`.
pub fn transactions_grid(rows: GridRows<'_>, sort: Option<Sort>, timezone: &Tz) -> Markup {
    let title = match rows {
        GridRows::Loading => "Transactions".to_owned(),
        GridRows::Ready(rows) => format!("{} Transactions", rows.len()),
    };

    html! {
        section id="transactions-grid" class="w-full"
        {
            div class="flex flex-wrap items-center justify-between gap-4 pb-6 border-b border-gray-200 dark:border-gray-700"
            {
                div
                {
                    h2 class="text-2xl font-bold" { (title) }
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Your transactions for the last 7 days"
                    }
                }

                div class="flex gap-3"
                {
                    button
                        type="button"
                        class=(BUTTON_SECONDARY_STYLE)
                        hx-get=(endpoints::DASHBOARD_FILTER)
                        hx-target="#filter-panel"
                        hx-swap="innerHTML"
                    {
                        "Filter"
                    }

                    a
                        href=(endpoints::DASHBOARD_EXPORT)
                        download="transactions.csv"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Export list"
                    }
                }
            }

            div class="overflow-x-auto"
            {
                table class="w-full my-2 text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            @for (column, header) in COLUMNS {
                                (header_cell(column, header, sort))
                            }
                        }
                    }

                    tbody
                    {
                        @match rows {
                            GridRows::Loading => {
                                @for _ in 0..SKELETON_ROW_COUNT {
                                    (skeleton_row())
                                }
                            }
                            GridRows::Ready([]) => {
                                tr
                                {
                                    td
                                        colspan=(COLUMNS.len())
                                        data-empty-state="true"
                                        class="px-6 py-4 text-center"
                                    {
                                        "No transactions found"
                                    }
                                }
                            }
                            GridRows::Ready(rows) => {
                                @for transaction in rows {
                                    (transaction_row(transaction, timezone))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn header_cell(column: SortColumn, header: &str, sort: Option<Sort>) -> Markup {
    let active_order = sort
        .filter(|sort| sort.column == column)
        .map(|sort| sort.order);
    let aria_sort = match active_order {
        Some(SortOrder::Ascending) => "ascending",
        Some(SortOrder::Descending) => "descending",
        None => "none",
    };
    let indicator = match active_order {
        Some(SortOrder::Ascending) => " ↑",
        Some(SortOrder::Descending) => " ↓",
        None => "",
    };

    html! {
        th scope="col" class="px-6 py-3" aria-sort=(aria_sort)
        {
            a
                href="#"
                hx-get=(sort_url(next_sort(sort, column)))
                hx-target="#transactions-grid"
                hx-swap="outerHTML"
                class="hover:text-gray-900 dark:hover:text-white"
            {
                (header) (indicator)
            }
        }
    }
}

/// The grid URL that applies `sort`, or removes sorting if `None`.
pub fn sort_url(sort: Option<Sort>) -> String {
    match sort {
        Some(Sort { column, order }) => format!(
            "{}?sort={}&order={}",
            endpoints::DASHBOARD_TRANSACTIONS,
            column.as_str(),
            order.as_str()
        ),
        None => endpoints::DASHBOARD_TRANSACTIONS.to_owned(),
    }
}

fn transaction_row(transaction: &Transaction, timezone: &Tz) -> Markup {
    let (label, tooltip) = truncate_label(row_label(transaction));
    let icon_style = if transaction.is_withdrawal() {
        "flex items-center justify-center w-12 h-12 rounded-full bg-red-50 text-red-600"
    } else {
        "flex items-center justify-center w-12 h-12 rounded-full bg-green-50 text-green-600"
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    span class=(icon_style) aria-hidden="true"
                    {
                        @if transaction.is_withdrawal() { "↗" } @else { "↙" }
                    }

                    div
                    {
                        p class="font-medium text-gray-900 dark:text-white" title=[tooltip]
                        {
                            (label)
                        }

                        @match row_subtitle(transaction) {
                            RowSubtitle::Status(status) => {
                                span class={ (BADGE_STYLE) " " (status_badge_style(status)) }
                                {
                                    (status.label())
                                }
                            }
                            RowSubtitle::Customer(name) => {
                                p class="text-sm" { (name) }
                            }
                            RowSubtitle::None => {}
                        }
                    }
                }
            }

            td class="px-6 py-4 font-bold text-gray-900 dark:text-white" data-amount="true"
            {
                (format_transaction_amount(transaction))
            }

            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date) { (format_short_date(transaction, timezone)) }
            }
        }
    }
}

fn skeleton_row() -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE) data-skeleton-row="true"
        {
            @for _ in COLUMNS {
                td class=(TABLE_CELL_STYLE)
                {
                    div class={ "h-4 w-24 " (SKELETON_STYLE) } {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        models::{Transaction, TransactionMetadata, TransactionStatus},
        test_utils::assert_valid_html,
        timezone::get_timezone,
    };

    use super::{
        GridRows, SKELETON_ROW_COUNT, Sort, SortColumn, SortOrder, sort_url, transactions_grid,
    };

    fn render(rows: GridRows<'_>, sort: Option<Sort>) -> Html {
        let utc = get_timezone("Etc/UTC").unwrap();
        let markup = transactions_grid(rows, sort, utc);
        let html = Html::parse_fragment(&markup.into_string());
        assert_valid_html(&html);

        html
    }

    fn count(html: &Html, selector: &str) -> usize {
        html.select(&Selector::parse(selector).unwrap()).count()
    }

    fn text_of(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("no element matches {selector}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[test]
    fn renders_a_row_per_transaction() {
        let transactions = vec![
            Transaction::build(500.0, "withdrawal", "2023-01-02")
                .status(TransactionStatus::Pending),
            Transaction::build(1000.0, "deposit", "2023-01-01").metadata(TransactionMetadata {
                name: "Roy Cash".to_owned(),
                country: "Nigeria".to_owned(),
                product_name: Some("Rich Dad Poor Dad".to_owned()),
                ..Default::default()
            }),
        ];

        let html = render(GridRows::Ready(&transactions), None);

        assert_eq!(count(&html, "tr[data-transaction-row]"), 2);
        assert_eq!(text_of(&html, "h2"), "2 Transactions");

        let rows: Vec<String> = html
            .select(&Selector::parse("tr[data-transaction-row]").unwrap())
            .map(|row| row.text().collect::<Vec<_>>().join("|"))
            .collect();
        assert!(rows[0].contains("Withdrawal"));
        assert!(rows[0].contains("Pending"));
        assert!(rows[0].contains("USD 500.00"));
        assert!(rows[0].contains("Jan 02, 2023"));
        assert!(rows[1].contains("Rich Dad Poor Dad"));
        assert!(rows[1].contains("Roy Cash"));
        assert!(rows[1].contains("NGN 1,000.00"));
    }

    #[test]
    fn empty_grid_has_single_spanning_row() {
        let html = render(GridRows::Ready(&[]), None);

        assert_eq!(count(&html, "tbody tr"), 1);
        let cell = html
            .select(&Selector::parse("td[data-empty-state]").unwrap())
            .next()
            .expect("empty state cell");
        assert_eq!(cell.value().attr("colspan"), Some("3"));
        assert_eq!(
            cell.text().collect::<String>().trim(),
            "No transactions found"
        );
        assert_eq!(text_of(&html, "h2"), "0 Transactions");
    }

    #[test]
    fn loading_grid_shows_skeleton_rows() {
        let html = render(GridRows::Loading, None);

        assert_eq!(count(&html, "tr[data-skeleton-row]"), SKELETON_ROW_COUNT);
        assert_eq!(count(&html, "tr[data-transaction-row]"), 0);
        assert_eq!(count(&html, "td[data-empty-state]"), 0);
    }

    #[test]
    fn header_links_cycle_sort() {
        let sort = Some(Sort {
            column: SortColumn::Amount,
            order: SortOrder::Ascending,
        });

        let html = render(GridRows::Ready(&[]), sort);

        let links: Vec<&str> = html
            .select(&Selector::parse("th a").unwrap())
            .filter_map(|link| link.value().attr("hx-get"))
            .collect();
        assert_eq!(
            links,
            [
                "/dashboard/transactions?sort=type&order=asc",
                "/dashboard/transactions?sort=amount&order=desc",
                "/dashboard/transactions?sort=date&order=asc",
            ]
        );

        let sorted_header = html
            .select(&Selector::parse("th[aria-sort=ascending]").unwrap())
            .next()
            .expect("sorted header");
        assert!(sorted_header.text().collect::<String>().contains("Amount"));
    }

    #[test]
    fn descending_header_link_removes_sort() {
        assert_eq!(sort_url(None), "/dashboard/transactions");
    }

    #[test]
    fn long_labels_have_tooltips() {
        let name = "An Extraordinarily Long Product Name For Testing";
        let transactions = [Transaction::build(1.0, "deposit", "2023-01-01").metadata(
            TransactionMetadata {
                product_name: Some(name.to_owned()),
                ..Default::default()
            },
        )];

        let html = render(GridRows::Ready(&transactions), None);

        let label = html
            .select(&Selector::parse("p[title]").unwrap())
            .next()
            .expect("label with tooltip");
        assert_eq!(label.value().attr("title"), Some(name));
    }
}
