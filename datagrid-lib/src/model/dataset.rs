//! Dataset loading and validation

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::debug;
use log::info;
use serde::Deserialize;
use serde::Serialize;

use super::Column;
use super::DataRow;
use crate::error::DatasetError;

/// The static input of the grid: a column schema plus row records.
///
/// Supplied once at startup and never replaced. Columns are kept sorted by
/// ordinal position; rows keep file order.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::Dataset;
///
/// let dataset = Dataset::from_json(r#"{
///     "columns": [
///         {"id": "name", "ordinalNo": 1, "title": "Name", "type": "string"},
///         {"id": "age", "ordinalNo": 2, "title": "Age", "type": "number"}
///     ],
///     "data": [
///         {"id": "1", "name": "Bob", "age": 30},
///         {"id": "2", "name": "Amy", "age": 25}
///     ]
/// }"#).unwrap();
///
/// assert_eq!(dataset.columns().len(), 2);
/// assert_eq!(dataset.rows().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<Column>,
    data: Vec<DataRow>,
}

/// Wire shape of a dataset file, before validation.
#[derive(Deserialize)]
struct RawDataset {
    columns: Vec<Column>,
    data: Vec<DataRow>,
}

impl Dataset {
    /// Builds a dataset from parts, validating ids and ordering columns.
    pub fn new(mut columns: Vec<Column>, data: Vec<DataRow>) -> Result<Self, DatasetError> {
        let mut column_ids = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !column_ids.insert(column.id.as_str()) {
                return Err(DatasetError::duplicate_column(&column.id));
            }
        }

        let mut row_ids = HashSet::with_capacity(data.len());
        for row in &data {
            if !row_ids.insert(row.id()) {
                return Err(DatasetError::duplicate_row(row.id()));
            }
        }

        // Stable, so equal ordinals keep file order.
        columns.sort_by_key(|column| column.ordinal_no);

        Ok(Self { columns, data })
    }

    /// Parses and validates a dataset from JSON text.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let raw: RawDataset = serde_json::from_str(json)?;
        Self::new(raw.columns, raw.data)
    }

    /// Reads, parses, and validates a dataset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        debug!("Loading dataset from {}", path.display());

        let json = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json(&json)?;

        info!(
            "Loaded dataset {}: {} columns, {} rows",
            path.display(),
            dataset.columns.len(),
            dataset.data.len()
        );
        Ok(dataset)
    }

    /// Returns the columns in ordinal order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the rows in source order.
    pub fn rows(&self) -> &[DataRow] {
        &self.data
    }

    /// Looks up a column by id.
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == id)
    }

    /// Looks up a row by id.
    pub fn row(&self, id: &str) -> Option<&DataRow> {
        self.data.iter().find(|row| row.id() == id)
    }

    /// Returns the column ids in ordinal order.
    pub fn column_ids(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnType;

    #[test]
    fn test_columns_sorted_by_ordinal() {
        let dataset = Dataset::new(
            vec![
                Column::new("b", 2, "B", ColumnType::Text),
                Column::new("a", 1, "A", ColumnType::Text),
                Column::new("c", 2, "C", ColumnType::Text),
            ],
            vec![],
        )
        .unwrap();

        assert_eq!(dataset.column_ids(), ["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = Dataset::new(
            vec![
                Column::new("a", 1, "A", ColumnType::Text),
                Column::new("a", 2, "A again", ColumnType::Numeric),
            ],
            vec![],
        )
        .unwrap_err();

        assert!(matches!(err, DatasetError::DuplicateColumn { id } if id == "a"));
    }

    #[test]
    fn test_duplicate_row_rejected() {
        let err = Dataset::new(vec![], vec![DataRow::new("1"), DataRow::new("1")]).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateRow { id } if id == "1"));
    }

    #[test]
    fn test_lookup_by_id() {
        let dataset = Dataset::new(
            vec![Column::new("name", 1, "Name", ColumnType::Text)],
            vec![DataRow::new("1").set("name", "Bob")],
        )
        .unwrap();

        assert_eq!(dataset.column("name").map(|c| c.title.as_str()), Some("Name"));
        assert!(dataset.column("age").is_none());
        assert!(dataset.row("1").is_some());
        assert!(dataset.row("2").is_none());
    }

    #[test]
    fn test_from_json_parse_error() {
        let err = Dataset::from_json(r#"{"columns": []}"#).unwrap_err();
        assert!(matches!(err, DatasetError::Parse(_)));
    }
}
