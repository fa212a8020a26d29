//! Sort ordering for the view.

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::model::DataRow;

/// Sort direction for the sort column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9).
    #[default]
    #[serde(rename = "asc")]
    Asc,
    /// Descending order (Z-A, 9-0).
    #[serde(rename = "desc")]
    Desc,
}

impl SortOrder {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Applies this direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Arrow shown next to a sorted header.
    pub fn indicator(self) -> char {
        match self {
            SortOrder::Asc => '▲',
            SortOrder::Desc => '▼',
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

/// Compares two rows by one field.
///
/// A missing field sorts like null, before every present value.
pub fn compare_rows(a: &DataRow, b: &DataRow, key: &str, order: SortOrder) -> Ordering {
    let ordering = match (a.get(key), b.get(key)) {
        (Some(x), Some(y)) => x.sort_cmp(y),
        (None, Some(y)) if !y.is_null() => Ordering::Less,
        (Some(x), None) if !x.is_null() => Ordering::Greater,
        _ => Ordering::Equal,
    };
    order.apply(ordering)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flipped() {
        assert_eq!(SortOrder::Asc.flipped(), SortOrder::Desc);
        assert_eq!(SortOrder::Desc.flipped().flipped(), SortOrder::Desc);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&SortOrder::Asc).unwrap(), "\"asc\"");
        assert_eq!(
            serde_json::from_str::<SortOrder>("\"desc\"").unwrap(),
            SortOrder::Desc
        );
    }

    #[test]
    fn test_compare_rows_missing_field_sorts_first() {
        let with = DataRow::new("1").set("age", 3);
        let without = DataRow::new("2");

        assert_eq!(
            compare_rows(&without, &with, "age", SortOrder::Asc),
            Ordering::Less
        );
        assert_eq!(
            compare_rows(&without, &with, "age", SortOrder::Desc),
            Ordering::Greater
        );
        assert_eq!(
            compare_rows(&without, &without, "age", SortOrder::Asc),
            Ordering::Equal
        );
    }
}
