//! View derivation: dataset + view state → rows and cells to paint.
//!
//! The pipeline runs in a fixed order:
//!
//! 1. sort a copy of the rows by the sort key (stable)
//! 2. drop rows whose concatenated text does not contain the search query
//! 3. select visible columns, in ordinal order (independent of rows)
//! 4. keep the first `reveal_count` rows
//! 5. resolve each cell through the edit overrides
//!
//! Growing the reveal count therefore always surfaces the next rows of the
//! sorted, filtered sequence.

use super::ViewState;
use super::compare_rows;
use crate::model::Column;
use crate::model::DataRow;
use crate::model::Dataset;
use crate::model::Value;

/// One revealed row with its resolved cells, one per visible column.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow<'a> {
    pub row: &'a DataRow,
    pub cells: Vec<Option<&'a Value>>,
}

impl<'a> ViewRow<'a> {
    pub fn id(&self) -> &'a str {
        self.row.id()
    }
}

/// The exact header and body the grid should paint.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView<'a> {
    /// Visible columns in ordinal order.
    pub columns: Vec<&'a Column>,
    /// Revealed rows.
    pub rows: Vec<ViewRow<'a>>,
    /// Number of rows that passed the search stage.
    pub matched: usize,
    /// Number of rows in the dataset.
    pub total: usize,
}

impl DerivedView<'_> {
    /// Returns `true` if rows matched the search but are not yet revealed.
    pub fn has_more(&self) -> bool {
        self.rows.len() < self.matched
    }
}

/// Runs the full pipeline over a dataset.
pub fn derive<'a>(dataset: &'a Dataset, state: &'a ViewState) -> DerivedView<'a> {
    derive_view(dataset.rows(), dataset.columns(), state)
}

/// Runs the full pipeline over rows and columns.
pub fn derive_view<'a>(
    rows: &'a [DataRow],
    columns: &'a [Column],
    state: &'a ViewState,
) -> DerivedView<'a> {
    let total = rows.len();
    let sorted = sort_rows(rows, state);
    let filtered = search_rows(sorted, state.search_query());
    let matched = filtered.len();
    let visible = visible_columns(columns, state);

    let revealed = filtered
        .into_iter()
        .take(state.reveal_count())
        .map(|row| ViewRow {
            row,
            cells: visible
                .iter()
                .map(|column| resolve_cell(state, row, &column.id))
                .collect(),
        })
        .collect();

    DerivedView {
        columns: visible,
        rows: revealed,
        matched,
        total,
    }
}

/// Sort stage. Returns the rows in source order when no sort key is set.
pub fn sort_rows<'a>(rows: &'a [DataRow], state: &ViewState) -> Vec<&'a DataRow> {
    let mut sorted: Vec<&DataRow> = rows.iter().collect();
    if let Some(key) = state.sort_key() {
        // `sort_by` is stable, so equal keys keep their relative order.
        sorted.sort_by(|a, b| compare_rows(a, b, key, state.sort_order()));
    }
    sorted
}

/// Search stage. Matching is case-insensitive over every field of the source
/// row, including fields that are not visible.
pub fn search_rows<'a>(rows: Vec<&'a DataRow>, query: &str) -> Vec<&'a DataRow> {
    if query.is_empty() {
        return rows;
    }
    let needle = query.to_lowercase();
    rows.into_iter()
        .filter(|row| row.search_text().contains(&needle))
        .collect()
}

/// Column filter stage. Keeps ordinal order regardless of the order columns
/// were made visible in.
pub fn visible_columns<'a>(columns: &'a [Column], state: &ViewState) -> Vec<&'a Column> {
    columns
        .iter()
        .filter(|column| state.is_column_visible(&column.id))
        .collect()
}

/// Cell resolution: the override when present, else the source value.
pub fn resolve_cell<'a>(
    state: &'a ViewState,
    row: &'a DataRow,
    column_id: &str,
) -> Option<&'a Value> {
    state
        .edit_for(row.id(), column_id)
        .or_else(|| row.get(column_id))
}
