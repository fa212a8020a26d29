//! View state holder.

use log::debug;
use log::trace;

use super::EditOverrides;
use super::SortOrder;
use crate::model::DataRow;
use crate::model::Dataset;
use crate::model::Value;

/// Number of rows realized when a view is first mounted.
pub const DEFAULT_REVEAL_COUNT: usize = 20;

/// Transient UI state that drives view derivation.
///
/// Each mutator replaces exactly one field. None of them can fail: unknown
/// ids are accepted and simply have no visible effect.
///
/// # Example
///
/// ```
/// use datagrid_lib::view::{SortOrder, ViewState};
///
/// let mut state = ViewState::new(["name", "age"]);
/// state.set_sort("age");
/// state.set_sort("age");
/// assert_eq!(state.sort_key(), Some("age"));
/// assert_eq!(state.sort_order(), SortOrder::Desc);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub(crate) sort_key: Option<String>,
    pub(crate) sort_order: SortOrder,
    pub(crate) visible_columns: Vec<String>,
    pub(crate) search_query: String,
    pub(crate) edits: EditOverrides,
    pub(crate) reveal_count: usize,
}

impl ViewState {
    /// Creates the initial state: every given column visible, no sort, empty
    /// search, no edits, default reveal count.
    pub fn new<I, S>(column_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sort_key: None,
            sort_order: SortOrder::Asc,
            visible_columns: column_ids.into_iter().map(Into::into).collect(),
            search_query: String::new(),
            edits: EditOverrides::new(),
            reveal_count: DEFAULT_REVEAL_COUNT,
        }
    }

    /// Creates the initial state for a dataset, with all its columns visible.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        Self::new(dataset.column_ids())
    }

    /// Sets the initial reveal count (builder pattern).
    pub fn with_reveal_count(mut self, reveal_count: usize) -> Self {
        self.reveal_count = reveal_count;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn sort_key(&self) -> Option<&str> {
        self.sort_key.as_deref()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Returns the visible column ids, in the order they were made visible.
    pub fn visible_columns(&self) -> &[String] {
        &self.visible_columns
    }

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.visible_columns.iter().any(|id| id == column_id)
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn edits(&self) -> &EditOverrides {
        &self.edits
    }

    /// Returns the override for a cell, if any.
    pub fn edit_for(&self, row_id: &str, column_id: &str) -> Option<&Value> {
        self.edits.get(row_id, column_id)
    }

    pub fn reveal_count(&self) -> usize {
        self.reveal_count
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Sorts by a column. Choosing the current sort column again flips the
    /// direction; choosing another column sorts it ascending.
    pub fn set_sort(&mut self, column_id: &str) {
        if self.sort_key.as_deref() == Some(column_id) {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_key = Some(column_id.to_string());
            self.sort_order = SortOrder::Asc;
        }
        debug!("Sort set to {} {}", column_id, self.sort_order);
    }

    /// Hides a visible column, or appends a hidden one to the visible set.
    pub fn toggle_column_visibility(&mut self, column_id: &str) {
        if let Some(index) = self.visible_columns.iter().position(|id| id == column_id) {
            self.visible_columns.remove(index);
            debug!("Column {} hidden", column_id);
        } else {
            self.visible_columns.push(column_id.to_string());
            debug!("Column {} shown", column_id);
        }
    }

    /// Records an override for a cell. Any value is accepted.
    pub fn record_edit(&mut self, row_id: &str, column_id: &str, value: Value) {
        trace!("Edit {}-{} = {:?}", row_id, column_id, value);
        self.edits.record(row_id, column_id, value);
    }

    /// Seeds a cell's override with its current resolved value, unless it
    /// already has one. Returns the value the cell now resolves to.
    pub fn prime_edit(&mut self, row: &DataRow, column_id: &str) -> Value {
        if let Some(existing) = self.edits.get(row.id(), column_id) {
            return existing.clone();
        }
        let value = row.get(column_id).cloned().unwrap_or_default();
        self.edits.record(row.id(), column_id, value.clone());
        value
    }

    /// Replaces the search query verbatim.
    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.search_query = text.into();
    }

    /// Realizes `increment` more rows.
    pub fn grow_reveal(&mut self, increment: usize) {
        self.reveal_count = self.reveal_count.saturating_add(increment);
        debug!("Reveal count grown to {}", self.reveal_count);
    }
}
