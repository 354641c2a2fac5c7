//! What the dashboard is showing: its overall status and the rows in the grid.

use crate::{
    filter::{FilterSpec, filter_transactions},
    grid::{Sort, sort_transactions},
    models::Transaction,
    store::StoreSnapshot,
};

/// Which of the three dashboard bodies to render.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardStatus {
    /// At least one resource is still being fetched.
    Loading,
    /// A resource failed to load. Holds the message to show the user.
    Error(String),
    /// Everything has loaded.
    Ready,
}

impl DashboardStatus {
    /// Derive the status from a store snapshot.
    ///
    /// An error takes precedence over loading, so a failed resource is
    /// reported even while another is still in flight. The user's error is
    /// reported first, then the wallet's, then the transactions'.
    pub fn from_snapshot(snapshot: &StoreSnapshot) -> Self {
        if let Some(error) = snapshot.first_error() {
            return DashboardStatus::Error(error.to_string());
        }

        if snapshot.is_loading() || snapshot.transactions.is_unloaded() {
            DashboardStatus::Loading
        } else {
            DashboardStatus::Ready
        }
    }
}

/// The rows shown in the grid and how they were derived.
///
/// The rows are reset to the full transaction list whenever a new list
/// arrives. An applied filter is remembered for the filter panel but is not
/// re-run against the new list until it is applied again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    filter: Option<FilterSpec>,
    rows: Vec<Transaction>,
    sort: Option<Sort>,
    generation: Option<u64>,
}

impl DashboardView {
    /// Reset the rows to the full transaction list if it has changed since
    /// the rows were last derived.
    pub fn sync_with(&mut self, snapshot: &StoreSnapshot) {
        let generation = snapshot.transactions.generation();

        if self.generation != Some(generation) {
            tracing::debug!("transactions changed (generation {generation}), showing all rows");
            self.rows = snapshot.transactions.data().to_vec();
            self.generation = Some(generation);
        }
    }

    /// Show only the transactions in `snapshot` that match `filter`.
    pub fn apply_filter(&mut self, filter: FilterSpec, snapshot: &StoreSnapshot) {
        self.rows = filter_transactions(snapshot.transactions.data(), &filter);
        self.generation = Some(snapshot.transactions.generation());
        self.filter = Some(filter);
    }

    /// Forget the applied filter and show every transaction in `snapshot`.
    pub fn clear_filter(&mut self, snapshot: &StoreSnapshot) {
        self.filter = None;
        self.rows = snapshot.transactions.data().to_vec();
        self.generation = Some(snapshot.transactions.generation());
    }

    /// The last filter applied, if it has not been cleared.
    pub fn filter(&self) -> Option<&FilterSpec> {
        self.filter.as_ref()
    }

    pub fn set_sort(&mut self, sort: Option<Sort>) {
        self.sort = sort;
    }

    pub fn sort(&self) -> Option<Sort> {
        self.sort
    }

    /// The rows in the order they should be displayed and exported.
    pub fn displayed_rows(&self) -> Vec<Transaction> {
        let mut rows = self.rows.clone();

        if let Some(sort) = self.sort {
            sort_transactions(&mut rows, sort);
        }

        rows
    }
}
