//! Dynamic data row

use super::Value;

/// One record of the dataset, keyed by a unique row id.
///
/// Rows hold their fields in source order, so the concatenated search text
/// matches the order the fields were written in. The `id` field is kept among
/// the fields as well as in [`DataRow::id`].
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{DataRow, Value};
///
/// let row = DataRow::new("1")
///     .set("name", "Bob")
///     .set("age", 30);
///
/// assert_eq!(row.id(), "1");
/// assert_eq!(row.get("age"), Some(&Value::from(30)));
/// assert_eq!(row.get("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    /// The unique identifier of the row.
    pub(crate) id: String,

    /// The field values, in source order.
    pub(crate) fields: Vec<(String, Value)>,
}

impl DataRow {
    /// Creates a new row with only its `id` field.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            fields: vec![("id".to_string(), Value::Text(id.clone()))],
            id,
        }
    }

    /// Returns the row id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Iterates over all fields in source order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Inserts a field value, replacing an existing field in place.
    pub(crate) fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Concatenated string form of every field value, lowercased.
    ///
    /// This is the text the search stage matches against.
    pub fn search_text(&self) -> String {
        self.fields
            .iter()
            .map(|(_, value)| value.to_display_string())
            .collect::<String>()
            .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let row = DataRow::new("1").set("name", "Bob").set("name", "Rob");

        let names: Vec<_> = row.fields().map(|(name, _)| name).collect();
        assert_eq!(names, ["id", "name"]);
        assert_eq!(row.get("name"), Some(&Value::from("Rob")));
    }

    #[test]
    fn test_search_text_includes_id_and_all_fields() {
        let row = DataRow::new("7")
            .set("name", "Amy")
            .set("age", 25)
            .set("active", true)
            .set("note", Value::Null);

        assert_eq!(row.search_text(), "7amy25true");
    }
}
