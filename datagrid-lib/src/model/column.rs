//! Column schema

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// The declared kind of a column, which decides how its cells are edited.
///
/// Type tags are read from the dataset as plain strings. Several spellings are
/// accepted for each kind; anything else is kept as [`ColumnType::Unknown`] so
/// the grid can render nothing for it instead of refusing the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    /// Free text.
    Text,
    /// Numbers, edited as free text without parsing.
    Numeric,
    /// Yes/no.
    Boolean,
    /// One choice from an enumerated option list.
    SingleSelect,
    /// Unrecognized tag, kept verbatim.
    Unknown(String),
}

impl ColumnType {
    /// Returns the canonical tag for this type.
    pub fn as_str(&self) -> &str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Numeric => "numeric",
            ColumnType::Boolean => "boolean",
            ColumnType::SingleSelect => "single-select",
            ColumnType::Unknown(tag) => tag,
        }
    }
}

impl From<&str> for ColumnType {
    fn from(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "text" | "string" => ColumnType::Text,
            "numeric" | "number" => ColumnType::Numeric,
            "boolean" | "bool" => ColumnType::Boolean,
            "single-select" | "selection" | "select" => ColumnType::SingleSelect,
            _ => ColumnType::Unknown(tag.to_string()),
        }
    }
}

impl From<String> for ColumnType {
    fn from(tag: String) -> Self {
        ColumnType::from(tag.as_str())
    }
}

impl From<ColumnType> for String {
    fn from(ty: ColumnType) -> Self {
        ty.as_str().to_string()
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema descriptor for one table attribute.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{Column, ColumnType};
///
/// let status = Column::new("status", 3, "Status", ColumnType::SingleSelect)
///     .with_width(12)
///     .with_options(["open", "closed"]);
/// assert_eq!(status.options(), ["open", "closed"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Unique column key; also the field name in each row.
    pub id: String,
    /// Position of the column in the grid.
    #[serde(default)]
    pub ordinal_no: i64,
    /// Header text.
    pub title: String,
    /// Declared type tag.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Display width in terminal cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
    /// Enumerated options for single-select columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Column {
    /// Creates a new column without width or options.
    pub fn new(
        id: impl Into<String>,
        ordinal_no: i64,
        title: impl Into<String>,
        column_type: ColumnType,
    ) -> Self {
        Self {
            id: id.into(),
            ordinal_no,
            title: title.into(),
            column_type,
            width: None,
            options: Vec::new(),
        }
    }

    /// Sets the display width.
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the enumerated option list.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the declared option list.
    pub fn options(&self) -> &[String] {
        &self.options
    }
}
