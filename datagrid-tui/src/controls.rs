//! Editable controls, chosen per column type.

use std::collections::BTreeSet;

use datagrid_lib::model::{Column, ColumnType, Dataset, Value};

/// One selectable option of a choice control.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub label: String,
    pub value: Value,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// The control a cell is edited with.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// Free text; numeric columns are edited as text too
    Text,
    /// Fixed list of options
    Select(Vec<Choice>),
    /// Unrecognized column type: rendered empty, not editable
    None,
}

impl Control {
    pub fn for_column(dataset: &Dataset, column: &Column) -> Self {
        match &column.column_type {
            ColumnType::Text | ColumnType::Numeric => Control::Text,
            ColumnType::Boolean => Control::Select(vec![
                Choice::new("yes", true),
                Choice::new("no", false),
            ]),
            ColumnType::SingleSelect => Control::Select(
                select_options(dataset, column)
                    .into_iter()
                    .map(|option| Choice::new(option.clone(), option))
                    .collect(),
            ),
            ColumnType::Unknown(_) => Control::None,
        }
    }
}

/// Options of a single-select column: the declared list, or else the distinct
/// non-empty values present in the column, sorted.
pub fn select_options(dataset: &Dataset, column: &Column) -> Vec<String> {
    if !column.options().is_empty() {
        return column.options().to_vec();
    }

    dataset
        .rows()
        .iter()
        .filter_map(|row| row.get(&column.id))
        .map(Value::to_display_string)
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Text painted for a cell value under a column's control.
///
/// Returns `None` for columns that render nothing.
pub fn cell_text(column: &Column, value: Option<&Value>) -> Option<String> {
    match &column.column_type {
        ColumnType::Unknown(_) => None,
        ColumnType::Boolean => Some(match value.and_then(Value::as_bool) {
            Some(true) => "yes".to_string(),
            Some(false) => "no".to_string(),
            None => value.map(Value::to_display_string).unwrap_or_default(),
        }),
        _ => Some(value.map(Value::to_display_string).unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagrid_lib::model::DataRow;

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                Column::new("status", 1, "Status", ColumnType::SingleSelect),
                Column::new("tier", 2, "Tier", ColumnType::SingleSelect)
                    .with_options(["gold", "silver"]),
                Column::new("active", 3, "Active", ColumnType::Boolean),
                Column::new("due", 4, "Due", ColumnType::Unknown("date".into())),
                Column::new("age", 5, "Age", ColumnType::Numeric),
            ],
            vec![
                DataRow::new("1").set("status", "open").set("active", true),
                DataRow::new("2").set("status", "closed"),
                DataRow::new("3").set("status", "open").set("status", Value::Null),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_declared_options_win() {
        let dataset = dataset();
        let tier = dataset.column("tier").unwrap();
        assert_eq!(select_options(&dataset, tier), ["gold", "silver"]);
    }

    #[test]
    fn test_options_fall_back_to_column_values() {
        let dataset = dataset();
        let status = dataset.column("status").unwrap();
        assert_eq!(select_options(&dataset, status), ["closed", "open"]);
    }

    #[test]
    fn test_control_by_type() {
        let dataset = dataset();

        assert_eq!(
            Control::for_column(&dataset, dataset.column("age").unwrap()),
            Control::Text
        );
        assert_eq!(
            Control::for_column(&dataset, dataset.column("due").unwrap()),
            Control::None
        );
        assert_eq!(
            Control::for_column(&dataset, dataset.column("active").unwrap()),
            Control::Select(vec![Choice::new("yes", true), Choice::new("no", false)])
        );
    }

    #[test]
    fn test_cell_text() {
        let dataset = dataset();
        let active = dataset.column("active").unwrap();
        let due = dataset.column("due").unwrap();
        let age = dataset.column("age").unwrap();

        assert_eq!(cell_text(active, Some(&Value::from(false))).as_deref(), Some("no"));
        assert_eq!(cell_text(active, None).as_deref(), Some(""));
        assert_eq!(cell_text(due, Some(&Value::from("2024-01-01"))), None);
        assert_eq!(cell_text(age, Some(&Value::from(30))).as_deref(), Some("30"));
    }
}
