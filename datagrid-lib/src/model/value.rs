//! Value enum for dynamic cell values

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;

/// A dynamic value that can hold any cell of a dataset row.
///
/// Cells come from JSON, so the variants mirror JSON's scalar kinds. Arrays and
/// objects are not interpreted and are carried as raw JSON.
///
/// # Type Mapping
///
/// | JSON | Rust Variant |
/// |------|--------------|
/// | null | `Null` |
/// | true/false | `Bool` |
/// | number | `Number` |
/// | string | `Text` |
/// | array, object | `Json` |
///
/// # Example
///
/// ```
/// use datagrid_lib::model::Value;
///
/// let name = Value::from("Bob");
/// let age = Value::from(30);
/// let active = Value::from(true);
/// let empty = Value::Null;
/// assert_eq!(age.to_display_string(), "30");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Any JSON number.
    Number(f64),
    /// String value.
    Text(String),
    /// Fallback for arrays and objects.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean payload, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String form used for display and for search matching.
    ///
    /// Null becomes the empty string. Integral numbers print without a
    /// fractional part.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::Json(json) => json.to_string(),
        }
    }

    /// Position of this value's kind in the cross-kind ordering.
    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::Text(_) => 3,
            Value::Json(_) => 4,
        }
    }

    /// Total ordering used by column sorting.
    ///
    /// Values of the same kind compare naturally. Values of different kinds
    /// compare by kind: null, boolean, number, text, then raw JSON.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Json(a), Value::Json(b)) => a.to_string().cmp(&b.to_string()),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

/// Returns the integer form of `n` when it has no fractional part.
fn as_integral(n: f64) -> Option<i64> {
    (n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15).then_some(n as i64)
}

fn format_number(n: f64) -> String {
    match as_integral(n) {
        Some(i) => i.to_string(),
        None => n.to_string(),
    }
}

// Integral numbers serialize as JSON integers, so `30` survives a round trip
// through a snapshot as `30` rather than `30.0`.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match as_integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Value::Text(s) => serializer.serialize_str(s),
            Value::Json(json) => json.serialize(serializer),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Value::Number(f),
                None => Value::Json(serde_json::Value::Number(n)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Json(other),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_string_forms() {
        assert_eq!(Value::Null.to_display_string(), "");
        assert_eq!(Value::from(true).to_display_string(), "true");
        assert_eq!(Value::from(30).to_display_string(), "30");
        assert_eq!(Value::from(2.5).to_display_string(), "2.5");
        assert_eq!(Value::from("Amy").to_display_string(), "Amy");
        assert_eq!(
            Value::from(serde_json::json!(["a", 1])).to_display_string(),
            r#"["a",1]"#
        );
    }

    #[test]
    fn test_deserialize_untagged() {
        let values: Vec<Value> =
            serde_json::from_str(r#"[null, false, 42, 1.5, "x", {"k": 1}]"#).unwrap();
        assert_eq!(values[0], Value::Null);
        assert_eq!(values[1], Value::Bool(false));
        assert_eq!(values[2], Value::Number(42.0));
        assert_eq!(values[3], Value::Number(1.5));
        assert_eq!(values[4], Value::Text("x".into()));
        assert_eq!(values[5], Value::Json(serde_json::json!({"k": 1})));
    }

    #[test]
    fn test_default_is_null() {
        assert_eq!(Value::default(), Value::Null);
        assert_eq!(Value::default().to_display_string(), "");
    }

    #[test]
    fn test_serialize_integral_numbers_as_integers() {
        let values = vec![Value::from(30), Value::from(2.5), Value::Null, Value::from("x")];
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"[30,2.5,null,"x"]"#);
    }

    #[test]
    fn test_sort_cmp_same_kind() {
        assert_eq!(Value::from(25).sort_cmp(&Value::from(30)), Ordering::Less);
        assert_eq!(Value::from("b").sort_cmp(&Value::from("a")), Ordering::Greater);
        assert_eq!(Value::from(false).sort_cmp(&Value::from(true)), Ordering::Less);
        assert_eq!(Value::Null.sort_cmp(&Value::Null), Ordering::Equal);
    }

    #[test]
    fn test_sort_cmp_mixed_kinds_by_rank() {
        assert_eq!(Value::Null.sort_cmp(&Value::from(false)), Ordering::Less);
        assert_eq!(Value::from(100).sort_cmp(&Value::from("1")), Ordering::Less);
        assert_eq!(Value::from("z").sort_cmp(&Value::from(0)), Ordering::Greater);
    }
}
