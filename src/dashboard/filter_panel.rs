//! The filter panel and the form it submits.

use std::collections::BTreeSet;

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};
use time_tz::Tz;

use crate::{
    Error, endpoints,
    filter::{AmountRange, DatePreset, DateRange, FilterSpec},
    html::{
        BUTTON_CHIP_ACTIVE_STYLE, BUTTON_CHIP_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE,
        FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
    },
    models::{Transaction, TransactionStatus},
    timezone::{end_of_day, local_date, start_of_day},
};

const DATE_INPUT_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// The filter panel's fields as submitted by the browser.
///
/// Every field is text so that the panel can be re-rendered with exactly what
/// the user entered. Use [FilterForm::to_spec] to validate it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterForm {
    /// The preset the dates were filled in from, e.g. "last7days".
    #[serde(default)]
    pub active_preset: String,
    /// The first day to include, as "YYYY-MM-DD".
    #[serde(default)]
    pub from: String,
    /// The last day to include, as "YYYY-MM-DD".
    #[serde(default)]
    pub to: String,
    /// The checked transaction types.
    #[serde(default)]
    pub transaction_type: Vec<String>,
    /// The checked statuses, e.g. "pending".
    #[serde(default)]
    pub status: Vec<String>,
    /// The smallest amount to include.
    #[serde(default)]
    pub min_amount: String,
    /// The largest amount to include.
    #[serde(default)]
    pub max_amount: String,
}

/// The query string of a preset button, e.g. `?preset=last7days`.
#[derive(Debug, Deserialize)]
pub struct PresetQuery {
    /// The preset that was clicked.
    pub preset: DatePreset,
}

/// The URL that fills in the dates for `preset`.
fn preset_url(preset: DatePreset) -> String {
    format!("{}?preset={}", endpoints::DASHBOARD_FILTER_PRESET, preset.as_str())
}

impl FilterForm {
    /// Validate the form and turn it into a filter.
    ///
    /// Dates are read as days in `timezone`: `from` is the start of its day
    /// and `to` the end of its day. Blank fields are left unset.
    ///
    /// # Errors
    /// Returns [Error::InvalidFilter] if a date, amount or status cannot be
    /// parsed.
    pub fn to_spec(&self, timezone: &Tz) -> Result<FilterSpec, Error> {
        let statuses = self
            .status
            .iter()
            .filter(|status| !status.trim().is_empty())
            .map(|status| {
                TransactionStatus::parse(status)
                    .ok_or_else(|| Error::InvalidFilter(format!("Unknown status \"{status}\"")))
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        let from = parse_date(&self.from, "From date")?.map(|date| start_of_day(date, timezone));
        let to = parse_date(&self.to, "To date")?.map(|date| end_of_day(date, timezone));
        let preset =
            DatePreset::parse(&self.active_preset).filter(|_| from.is_some() || to.is_some());

        Ok(FilterSpec {
            transaction_types: self
                .transaction_type
                .iter()
                .map(|kind| kind.trim())
                .filter(|kind| !kind.is_empty())
                .map(str::to_owned)
                .collect(),
            statuses,
            date_range: DateRange { from, to, preset },
            amount: AmountRange {
                min: parse_amount(&self.min_amount, "Minimum amount")?,
                max: parse_amount(&self.max_amount, "Maximum amount")?,
            },
        })
    }

    /// The form that would produce `spec`, with dates shown as days in `timezone`.
    pub fn from_spec(spec: &FilterSpec, timezone: &Tz) -> Self {
        let format_date = |date: Option<OffsetDateTime>| {
            date.and_then(|date| local_date(date, timezone).format(DATE_INPUT_FORMAT).ok())
                .unwrap_or_default()
        };
        let format_amount =
            |amount: Option<f64>| amount.map(|amount| amount.to_string()).unwrap_or_default();

        Self {
            active_preset: spec
                .date_range
                .preset
                .map(|preset| preset.as_str().to_owned())
                .unwrap_or_default(),
            from: format_date(spec.date_range.from),
            to: format_date(spec.date_range.to),
            transaction_type: spec.transaction_types.iter().cloned().collect(),
            status: spec
                .statuses
                .iter()
                .map(|status| status.as_str().to_owned())
                .collect(),
            min_amount: format_amount(spec.amount.min),
            max_amount: format_amount(spec.amount.max),
        }
    }
}

fn parse_date(text: &str, field: &str) -> Result<Option<Date>, Error> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    Date::parse(text, DATE_INPUT_FORMAT)
        .map(Some)
        .map_err(|_| Error::InvalidFilter(format!("{field} must be a date like 2023-01-31")))
}

fn parse_amount(text: &str, field: &str) -> Result<Option<f64>, Error> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    text.parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .map(Some)
        .ok_or_else(|| Error::InvalidFilter(format!("{field} must be a number")))
}

/// The distinct transaction types in `transactions`, in order of first appearance.
pub fn transaction_types(transactions: &[Transaction]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();

    for transaction in transactions {
        if !types.contains(&transaction.kind) {
            types.push(transaction.kind.clone());
        }
    }

    types
}

/// A transaction type as a label, e.g. "store_transaction" as "Store transaction".
fn type_label(kind: &str) -> String {
    let spaced = kind.replace('_', " ");
    let mut chars = spaced.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

/// The filter panel, filled in from `form`.
///
/// Checkboxes are offered for each of `transaction_types`.
pub fn filter_panel(form: &FilterForm, transaction_types: &[String]) -> Markup {
    let date_input = |name: &str, label: &str, value: &str| {
        html! {
            div class="flex-1"
            {
                label for=(name) class=(FORM_LABEL_STYLE) { (label) }
                input
                    type="date"
                    id=(name)
                    name=(name)
                    value=(value)
                    class=(FORM_TEXT_INPUT_STYLE)
                    hx-post=(endpoints::DASHBOARD_FILTER_DATES)
                    hx-trigger="change"
                    hx-include="closest form"
                    hx-target="#filter-panel"
                    hx-target-error="#alert-container";
            }
        }
    };

    html! {
        form
            id="filter-form"
            hx-post=(endpoints::DASHBOARD_FILTER)
            hx-target="#transactions-grid"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="flex flex-col gap-6 p-6 rounded-2xl shadow-lg bg-white dark:bg-gray-800"
        {
            div class="flex items-center justify-between"
            {
                h3 class="text-2xl font-bold" { "Filter" }

                button
                    type="button"
                    aria-label="Close"
                    class="text-xl"
                    onclick="document.getElementById('filter-panel').innerHTML = ''"
                {
                    "×"
                }
            }

            input type="hidden" name="active_preset" value=(form.active_preset);

            div class="flex flex-wrap gap-2"
            {
                @for preset in DatePreset::ALL {
                    button
                        type="button"
                        data-preset=(preset.as_str())
                        class=(preset_style(form, preset))
                        hx-post=(preset_url(preset))
                        hx-include="closest form"
                        hx-target="#filter-panel"
                        hx-target-error="#alert-container"
                    {
                        (preset.label())
                    }
                }
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Date Range" }

                div class="flex gap-2"
                {
                    (date_input("from", "From", &form.from))
                    (date_input("to", "To", &form.to))
                }
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Transaction Type" }

                @for kind in transaction_types {
                    label class="flex items-center gap-2 py-1"
                    {
                        input
                            type="checkbox"
                            name="transaction_type"
                            value=(kind)
                            checked[form.transaction_type.contains(kind)]
                            class=(FORM_CHECKBOX_STYLE);

                        span { (type_label(kind)) }
                    }
                }
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Transaction Status" }

                @for status in TransactionStatus::ALL {
                    label class="flex items-center gap-2 py-1"
                    {
                        input
                            type="checkbox"
                            name="status"
                            value=(status.as_str())
                            checked[form.status.iter().any(|checked| checked == status.as_str())]
                            class=(FORM_CHECKBOX_STYLE);

                        span { (status.label()) }
                    }
                }
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Amount" }

                div class="flex gap-2"
                {
                    input
                        type="number"
                        step="any"
                        name="min_amount"
                        placeholder="Min"
                        value=(form.min_amount)
                        class=(FORM_TEXT_INPUT_STYLE);

                    input
                        type="number"
                        step="any"
                        name="max_amount"
                        placeholder="Max"
                        value=(form.max_amount)
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div class="flex gap-3"
            {
                button
                    type="button"
                    class={ "flex-1 " (BUTTON_SECONDARY_STYLE) }
                    hx-post=(endpoints::DASHBOARD_FILTER_CLEAR)
                    hx-target="#transactions-grid"
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                {
                    "Clear"
                }

                button type="submit" class={ "flex-1 " (BUTTON_PRIMARY_STYLE) }
                {
                    "Apply Filter"
                }
            }
        }
    }
}

fn preset_style(form: &FilterForm, preset: DatePreset) -> &'static str {
    if form.active_preset == preset.as_str() {
        BUTTON_CHIP_ACTIVE_STYLE
    } else {
        BUTTON_CHIP_STYLE
    }
}

/// An out-of-band swap that closes the filter panel.
pub fn close_filter_panel() -> Markup {
    html! {
        div id="filter-panel" hx-swap-oob="true" {}
    }
}
