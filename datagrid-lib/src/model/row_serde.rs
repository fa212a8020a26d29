//! Custom serialization for DataRow.
//!
//! Rows are flat JSON objects: `{"id": "1", "name": "Bob", "age": 30}`.
//!
//! - `id` is required. A string is used as-is, a number is converted to its
//!   string form.
//! - Every other key becomes a field, in the order it appears.
//! - Duplicate keys keep the last value at the position of the first.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;

use super::DataRow;
use super::Value;

// =============================================================================
// Serialization
// =============================================================================

impl Serialize for DataRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Deserialization
// =============================================================================

impl<'de> Deserialize<'de> for DataRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DataRowVisitor)
    }
}

struct DataRowVisitor;

impl<'de> Visitor<'de> for DataRowVisitor {
    type Value = DataRow;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map representing a data row with an \"id\" field")
    }

    fn visit_map<M>(self, mut map: M) -> Result<DataRow, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut id: Option<String> = None;
        let mut row = DataRow {
            id: String::new(),
            fields: Vec::new(),
        };

        while let Some(key) = map.next_key::<String>()? {
            let raw: serde_json::Value = map.next_value()?;

            if key == "id" {
                id = Some(match &raw {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(n) => n.to_string(),
                    other => {
                        return Err(de::Error::invalid_type(
                            unexpected(other),
                            &"a string or number row id",
                        ));
                    }
                });
            }

            row.insert(key, Value::from(raw));
        }

        row.id = id.ok_or_else(|| de::Error::missing_field("id"))?;
        Ok(row)
    }
}

fn unexpected(value: &serde_json::Value) -> de::Unexpected<'_> {
    match value {
        serde_json::Value::Null => de::Unexpected::Unit,
        serde_json::Value::Bool(b) => de::Unexpected::Bool(*b),
        serde_json::Value::Array(_) => de::Unexpected::Seq,
        _ => de::Unexpected::Map,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_simple_row() {
        let json = r#"{"id": "1", "name": "Bob", "age": 30}"#;
        let row: DataRow = serde_json::from_str(json).unwrap();

        assert_eq!(row.id(), "1");
        assert_eq!(row.get("name"), Some(&Value::from("Bob")));
        assert_eq!(row.get("age"), Some(&Value::from(30)));
    }

    #[test]
    fn test_deserialize_preserves_field_order() {
        let json = r#"{"zeta": 1, "id": "r", "alpha": 2}"#;
        let row: DataRow = serde_json::from_str(json).unwrap();

        let names: Vec<_> = row.fields().map(|(name, _)| name).collect();
        assert_eq!(names, ["zeta", "id", "alpha"]);
    }

    #[test]
    fn test_deserialize_numeric_id() {
        let row: DataRow = serde_json::from_str(r#"{"id": 42, "name": "x"}"#).unwrap();
        assert_eq!(row.id(), "42");
    }

    #[test]
    fn test_deserialize_missing_id() {
        let err = serde_json::from_str::<DataRow>(r#"{"name": "x"}"#).unwrap_err();
        assert!(err.to_string().contains("missing field `id`"));
    }

    #[test]
    fn test_deserialize_invalid_id() {
        assert!(serde_json::from_str::<DataRow>(r#"{"id": true}"#).is_err());
    }

    #[test]
    fn test_serialize_row() {
        let row = DataRow::new("1").set("name", "Bob").set("age", 30);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"id":"1","name":"Bob","age":30}"#);
    }
}
