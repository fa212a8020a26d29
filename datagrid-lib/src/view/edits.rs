//! Edit overrides that shadow source cell values.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Value;

/// Per-row, per-column values that shadow the dataset for display.
///
/// The dataset itself is never touched. A resolved cell is
/// `edits[row][column]` when present, otherwise the source value.
///
/// Serializes as `{"<rowId>": {"<columnId>": value}}`, with keys sorted so
/// snapshots are stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditOverrides {
    rows: BTreeMap<String, BTreeMap<String, Value>>,
}

impl EditOverrides {
    /// Creates an empty override map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the override for a cell, creating the row entry if absent.
    pub fn record(
        &mut self,
        row_id: impl Into<String>,
        column_id: impl Into<String>,
        value: Value,
    ) {
        self.rows
            .entry(row_id.into())
            .or_default()
            .insert(column_id.into(), value);
    }

    /// Returns the override for a cell, if any.
    pub fn get(&self, row_id: &str, column_id: &str) -> Option<&Value> {
        self.rows.get(row_id)?.get(column_id)
    }

    /// Returns `true` if the cell has an override.
    pub fn contains(&self, row_id: &str, column_id: &str) -> bool {
        self.get(row_id, column_id).is_some()
    }

    /// Returns the number of overridden cells.
    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if no cell is overridden.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Address of one editable cell.
///
/// Its [`name`](CellName::name) is the composite `rowId-columnId` encoding
/// used to label the active editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellName {
    pub row_id: String,
    pub column_id: String,
}

impl CellName {
    /// Creates a new cell address.
    pub fn new(row_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            column_id: column_id.into(),
        }
    }

    /// Returns the `rowId-columnId` encoding.
    ///
    /// The encoding is a label only. Ids may contain `-`, so it cannot be
    /// split back into a row and a column.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row_id, self.column_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_get() {
        let mut edits = EditOverrides::new();
        edits.record("1", "name", Value::from("Rob"));
        edits.record("1", "age", Value::from("31"));
        edits.record("1", "name", Value::from("Robert"));

        assert_eq!(edits.get("1", "name"), Some(&Value::from("Robert")));
        assert_eq!(edits.get("1", "missing"), None);
        assert_eq!(edits.get("2", "name"), None);
        assert_eq!(edits.len(), 2);
    }

    #[test]
    fn test_serializes_as_nested_map() {
        let mut edits = EditOverrides::new();
        edits.record("2", "name", Value::from("Amy"));
        edits.record("1", "active", Value::from(false));

        let json = serde_json::to_string(&edits).unwrap();
        assert_eq!(json, r#"{"1":{"active":false},"2":{"name":"Amy"}}"#);
    }

    #[test]
    fn test_cell_names_can_collide() {
        let first = CellName::new("1-a", "name");
        let second = CellName::new("1", "a-name");

        assert_eq!(first.name(), "1-a-name");
        assert_eq!(first.name(), second.name());
        assert_ne!(first, second);
    }
}
