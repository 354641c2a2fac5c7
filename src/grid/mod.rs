//! The transactions grid: row presentation, sorting, rendering and CSV export.

mod columns;
mod export;
mod sort;
mod view;

pub(crate) use columns::{DEFAULT_CURRENCY, month_abbrev};
pub use export::{CsvDownload, transactions_to_csv};
pub use sort::{Sort, SortColumn, SortOrder, SortQuery, sort_transactions};
pub use view::{GridRows, transactions_grid};
