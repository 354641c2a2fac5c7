//! How each transaction field is presented in a grid row.

use time::Month;
use time_tz::Tz;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    html::format_amount,
    models::{Transaction, TransactionStatus},
    timezone::local_date,
};

/// The max number of graphemes to display in a row label before truncating
/// and displaying ellipses.
const MAX_LABEL_GRAPHEMES: usize = 32;

/// The currency used when a country is missing or not in [CURRENCY_BY_COUNTRY].
pub const DEFAULT_CURRENCY: &str = "USD";

/// ISO 4217 currency codes keyed by normalised country name.
const CURRENCY_BY_COUNTRY: [(&str, &str); 7] = [
    ("nigeria", "NGN"),
    ("united_states", "USD"),
    ("ghana", "GHS"),
    ("kenya", "KES"),
    ("south_africa", "ZAR"),
    ("united_kingdom", "GBP"),
    ("european_union", "EUR"),
];

/// The main text of a row.
pub fn row_label(transaction: &Transaction) -> &str {
    if transaction.is_withdrawal() {
        "Withdrawal"
    } else {
        transaction.product_name().unwrap_or("No product name")
    }
}

/// The secondary text of a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowSubtitle<'a> {
    /// Withdrawals show their status as a badge.
    Status(TransactionStatus),
    /// Sales show who bought the product.
    Customer(&'a str),
    /// A sale without a customer name.
    None,
}

pub fn row_subtitle(transaction: &Transaction) -> RowSubtitle<'_> {
    if transaction.is_withdrawal() {
        RowSubtitle::Status(transaction.status)
    } else {
        transaction
            .customer_name()
            .map_or(RowSubtitle::None, RowSubtitle::Customer)
    }
}

/// The text and background colours of a status badge.
pub fn status_badge_style(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Successful => "text-green-600 bg-green-50",
        TransactionStatus::Pending => "text-yellow-600 bg-yellow-50",
        TransactionStatus::Failed => "text-red-600 bg-red-50",
    }
}

/// The currency code for a customer's country.
///
/// The lookup ignores case and treats spaces as underscores, so "United
/// States" maps to USD.
pub fn currency_for_country(country: Option<&str>) -> &'static str {
    let Some(country) = country else {
        return DEFAULT_CURRENCY;
    };

    let key = country.trim().to_lowercase().replace(' ', "_");

    CURRENCY_BY_COUNTRY
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(DEFAULT_CURRENCY, |(_, code)| code)
}

/// The amount in the currency of the customer's country, e.g. "NGN 1,000.00".
pub fn format_transaction_amount(transaction: &Transaction) -> String {
    format_amount(currency_for_country(transaction.country()), transaction.amount)
}

/// The date as "Jan 01, 2023" in `timezone`.
///
/// Dates that cannot be parsed are shown as sent by the API.
pub fn format_short_date(transaction: &Transaction, timezone: &Tz) -> String {
    match transaction.timestamp() {
        Some(timestamp) => {
            let date = local_date(timestamp, timezone);
            format!(
                "{} {:02}, {}",
                month_abbrev(date.month()),
                date.day(),
                date.year()
            )
        }
        None => transaction.date.clone(),
    }
}

pub(crate) fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// Truncate long labels, returning the full label as a tooltip if truncated.
pub fn truncate_label(label: &str) -> (String, Option<&str>) {
    let label_length = label.graphemes(true).count();

    if label_length <= MAX_LABEL_GRAPHEMES {
        (label.to_owned(), None)
    } else {
        let truncated: String = label
            .graphemes(true)
            .take(MAX_LABEL_GRAPHEMES - 3)
            .collect();
        let truncated = truncated + "...";
        (truncated, Some(label))
    }
}
