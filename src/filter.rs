//! Filtering transactions by type, status, amount and date.
//!
//! A [FilterSpec] is a conjunction of optional predicates. Anything left
//! empty or unset lets every transaction through, so the default spec is the
//! identity. Filtering never reorders: survivors keep their input order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::{Date, Month, OffsetDateTime};
use time_tz::Tz;

use crate::{
    models::{Transaction, TransactionStatus},
    timezone::{end_of_day, local_date, start_of_day},
};

/// A shortcut for a commonly used date range, resolved relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatePreset {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "last7days")]
    Last7Days,
    #[serde(rename = "thismonth")]
    ThisMonth,
    #[serde(rename = "last3months")]
    Last3Months,
}

impl DatePreset {
    /// Every preset, in the order they are offered in the filter panel.
    pub const ALL: [DatePreset; 4] = [
        DatePreset::Today,
        DatePreset::Last7Days,
        DatePreset::ThisMonth,
        DatePreset::Last3Months,
    ];

    /// The form value for the preset.
    pub fn as_str(self) -> &'static str {
        match self {
            DatePreset::Today => "today",
            DatePreset::Last7Days => "last7days",
            DatePreset::ThisMonth => "thismonth",
            DatePreset::Last3Months => "last3months",
        }
    }

    /// The button label for the preset.
    pub fn label(self) -> &'static str {
        match self {
            DatePreset::Today => "Today",
            DatePreset::Last7Days => "Last 7 days",
            DatePreset::ThisMonth => "This month",
            DatePreset::Last3Months => "Last 3 months",
        }
    }

    /// Parse a form value such as "last7days".
    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == text.trim())
    }

    /// The concrete `(from, to)` bounds of the preset as seen at `now` in
    /// `timezone`.
    ///
    /// `to` is always the last instant of today. `from` is the first instant
    /// of the first day in the range, at the offset in force on that day.
    pub fn resolve(self, now: OffsetDateTime, timezone: &Tz) -> (OffsetDateTime, OffsetDateTime) {
        let today = local_date(now, timezone);

        let first_day = match self {
            DatePreset::Today => today,
            DatePreset::Last7Days => today.saturating_sub(time::Duration::days(6)),
            DatePreset::ThisMonth => today.replace_day(1).unwrap_or(today),
            DatePreset::Last3Months => months_before(today, 3),
        };

        (start_of_day(first_day, timezone), end_of_day(today, timezone))
    }
}

/// The same day of the month `months` months earlier, clamped to the last
/// day of the target month (e.g. 31 May minus three months is 28 February).
fn months_before(date: Date, months: u8) -> Date {
    let mut year = date.year();
    let mut month = date.month();

    for _ in 0..months {
        if month == Month::January {
            year -= 1;
        }
        month = month.previous();
    }

    let day = date.day().min(month.length(year));

    Date::from_calendar_date(year, month, day).unwrap_or(date)
}

/// Inclusive date bounds, optionally tagged with the preset that produced them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    /// Transactions before this instant are dropped.
    pub from: Option<OffsetDateTime>,
    /// Transactions after this instant are dropped.
    pub to: Option<OffsetDateTime>,
    /// The preset the bounds were resolved from, if they have not been
    /// edited since.
    pub preset: Option<DatePreset>,
}

impl DateRange {
    /// Replace both bounds with the resolution of `preset` at `now` in
    /// `timezone`.
    pub fn apply_preset(&mut self, preset: DatePreset, now: OffsetDateTime, timezone: &Tz) {
        let (from, to) = preset.resolve(now, timezone);
        self.from = Some(from);
        self.to = Some(to);
        self.preset = Some(preset);
    }

    /// Set the lower bound by hand, which clears any active preset.
    pub fn select_from(&mut self, from: Option<OffsetDateTime>) {
        self.from = from;
        self.preset = None;
    }

    /// Set the upper bound by hand, which clears any active preset.
    pub fn select_to(&mut self, to: Option<OffsetDateTime>) {
        self.to = to;
        self.preset = None;
    }

    /// Whether neither bound is set.
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    fn contains(&self, transaction: &Transaction) -> bool {
        if self.is_empty() {
            return true;
        }

        let Some(timestamp) = transaction.timestamp() else {
            return false;
        };

        self.from.is_none_or(|from| timestamp >= from) && self.to.is_none_or(|to| timestamp <= to)
    }
}

/// Inclusive amount bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AmountRange {
    /// The smallest amount to keep.
    pub min: Option<f64>,
    /// The largest amount to keep.
    pub max: Option<f64>,
}

impl AmountRange {
    /// Whether neither bound is set.
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    fn contains(&self, amount: f64) -> bool {
        self.min.is_none_or(|min| amount >= min) && self.max.is_none_or(|max| amount <= max)
    }
}

/// A status filter given as either one status or a set of them.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusSelection {
    Single(TransactionStatus),
    Set(BTreeSet<TransactionStatus>),
}

impl StatusSelection {
    /// The selection as a set, where a single status is a set of one.
    pub fn into_set(self) -> BTreeSet<TransactionStatus> {
        match self {
            StatusSelection::Single(status) => BTreeSet::from([status]),
            StatusSelection::Set(statuses) => statuses,
        }
    }
}

impl From<TransactionStatus> for StatusSelection {
    fn from(status: TransactionStatus) -> Self {
        StatusSelection::Single(status)
    }
}

impl From<BTreeSet<TransactionStatus>> for StatusSelection {
    fn from(statuses: BTreeSet<TransactionStatus>) -> Self {
        StatusSelection::Set(statuses)
    }
}

impl<const N: usize> From<[TransactionStatus; N]> for StatusSelection {
    fn from(statuses: [TransactionStatus; N]) -> Self {
        StatusSelection::Set(BTreeSet::from(statuses))
    }
}

impl FromIterator<TransactionStatus> for StatusSelection {
    fn from_iter<I: IntoIterator<Item = TransactionStatus>>(iter: I) -> Self {
        StatusSelection::Set(iter.into_iter().collect())
    }
}

/// The criteria a transaction must meet to be displayed.
///
/// Empty sets and unset bounds are pass-through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Keep transactions whose type is one of these.
    pub transaction_types: BTreeSet<String>,
    /// Keep transactions whose status is one of these.
    pub statuses: BTreeSet<TransactionStatus>,
    /// Keep transactions dated within this range.
    pub date_range: DateRange,
    /// Keep transactions whose amount is within this range.
    pub amount: AmountRange,
}

impl FilterSpec {
    /// Restrict to the given transaction types.
    pub fn transaction_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transaction_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to one status or any of a set of statuses.
    pub fn statuses(mut self, selection: impl Into<StatusSelection>) -> Self {
        self.statuses = selection.into().into_set();
        self
    }

    /// Restrict to amounts within `min..=max`; `None` leaves that side open.
    pub fn amount(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.amount = AmountRange { min, max };
        self
    }

    /// Restrict to the given date range.
    pub fn date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    /// Whether the filter lets every transaction through.
    pub fn is_empty(&self) -> bool {
        self.transaction_types.is_empty()
            && self.statuses.is_empty()
            && self.amount.is_empty()
            && self.date_range.is_empty()
    }

    /// Whether `transaction` satisfies every predicate.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        (self.transaction_types.is_empty() || self.transaction_types.contains(&transaction.kind))
            && (self.statuses.is_empty() || self.statuses.contains(&transaction.status))
            && self.amount.contains(transaction.amount)
            && self.date_range.contains(transaction)
    }
}

/// The transactions that satisfy `spec`, in their original order.
pub fn filter_transactions(transactions: &[Transaction], spec: &FilterSpec) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| spec.matches(transaction))
        .cloned()
        .collect()
}
