//! Sorting the grid by a column.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// A column the grid can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Type,
    Amount,
    Date,
}

impl SortColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            SortColumn::Type => "type",
            SortColumn::Amount => "amount",
            SortColumn::Date => "date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// The active sort of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: SortColumn,
    pub order: SortOrder,
}

/// The query string of a sort link, e.g. `?sort=amount&order=desc`.
///
/// A missing column means unsorted. A missing order means ascending.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SortQuery {
    pub sort: Option<SortColumn>,
    pub order: Option<SortOrder>,
}

impl SortQuery {
    pub fn into_sort(self) -> Option<Sort> {
        self.sort.map(|column| Sort {
            column,
            order: self.order.unwrap_or(SortOrder::Ascending),
        })
    }
}

/// The sort to apply when the header for `clicked` is clicked.
///
/// Repeated clicks on the same header cycle through ascending, descending and
/// unsorted. Clicking a different header sorts by it in ascending order.
pub fn next_sort(current: Option<Sort>, clicked: SortColumn) -> Option<Sort> {
    match current {
        Some(Sort { column, order }) if column == clicked => match order {
            SortOrder::Ascending => Some(Sort {
                column,
                order: SortOrder::Descending,
            }),
            SortOrder::Descending => None,
        },
        _ => Some(Sort {
            column: clicked,
            order: SortOrder::Ascending,
        }),
    }
}

/// Sort `transactions` in place, keeping the relative order of equal rows.
///
/// Dates that cannot be parsed sort before every valid date.
pub fn sort_transactions(transactions: &mut [Transaction], sort: Sort) {
    transactions.sort_by(|a, b| {
        let ordering = compare(a, b, sort.column);

        match sort.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

fn compare(a: &Transaction, b: &Transaction, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Type => a.kind.cmp(&b.kind),
        SortColumn::Amount => a.amount.total_cmp(&b.amount),
        SortColumn::Date => a.timestamp().cmp(&b.timestamp()),
    }
}
