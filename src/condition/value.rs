//! Condition value model
//!
//! Expected values on a condition and actual values resolved from the
//! evaluation context share this representation. Comparison between values
//! is loose: integers, floats and numeric strings compare numerically, the
//! way the host CMS compares request data against configured values.

use crate::error::{FieldsError, Result};
use indexmap::IndexMap;
use serde_json::{Number, Value as JsonValue};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Host-supplied unary predicate used by `CUSTOM` comparisons
#[derive(Clone)]
pub struct ConditionCallback(Arc<dyn Fn(&ConditionValue) -> bool + Send + Sync>);

impl ConditionCallback {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&ConditionValue) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    #[inline]
    pub fn call(&self, actual: &ConditionValue) -> bool {
        (self.0)(actual)
    }
}

impl fmt::Debug for ConditionCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConditionCallback({:p})", Arc::as_ptr(&self.0))
    }
}

/// Callbacks are equal only when they share the same closure
impl PartialEq for ConditionCallback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Condition value types
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConditionValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ConditionValue>),
    /// Keys keep document order; equality ignores it
    Map(IndexMap<String, ConditionValue>),
    Callback(ConditionCallback),
}

impl ConditionValue {
    /// Wrap a closure as a callable value for `CUSTOM` comparisons
    pub fn callback<F>(callback: F) -> Self
    where
        F: Fn(&ConditionValue) -> bool + Send + Sync + 'static,
    {
        ConditionValue::Callback(ConditionCallback::new(callback))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConditionValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConditionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConditionValue]> {
        match self {
            ConditionValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_callback(&self) -> Option<&ConditionCallback> {
        match self {
            ConditionValue::Callback(cb) => Some(cb),
            _ => None,
        }
    }

    /// Numeric view of the value; numeric strings count as numbers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConditionValue::Integer(i) => Some(*i as f64),
            ConditionValue::Float(f) => Some(*f),
            ConditionValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            ConditionValue::Null => false,
            ConditionValue::Bool(b) => *b,
            ConditionValue::Integer(i) => *i != 0,
            ConditionValue::Float(f) => *f != 0.0,
            ConditionValue::String(s) => !s.is_empty() && s != "0",
            ConditionValue::List(items) => !items.is_empty(),
            ConditionValue::Map(map) => !map.is_empty(),
            ConditionValue::Callback(_) => true,
        }
    }

    /// True when a callable value appears anywhere inside this value
    pub fn contains_callback(&self) -> bool {
        match self {
            ConditionValue::Callback(_) => true,
            ConditionValue::List(items) => items.iter().any(ConditionValue::contains_callback),
            ConditionValue::Map(map) => map.values().any(ConditionValue::contains_callback),
            _ => false,
        }
    }

    /// Loose equality used by the comparators
    pub fn loose_eq(&self, other: &ConditionValue) -> bool {
        use ConditionValue::*;

        match (self, other) {
            (Null, Null) => true,
            (Bool(a), b) | (b, Bool(a)) => *a == b.is_truthy(),
            (String(a), String(b)) => a == b,
            (List(a), List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (Map(a), Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, va)| b.get(key).is_some_and(|vb| va.loose_eq(vb)))
            }
            (Integer(a), Integer(b)) => a == b,
            (Integer(_) | Float(_) | String(_), Integer(_) | Float(_) | String(_)) => {
                match (self.as_f64(), other.as_f64()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Ordering used by scalar comparisons
    ///
    /// Numbers (and numeric strings) order numerically, other strings order
    /// lexicographically. Anything else is unordered.
    pub fn loose_cmp(&self, other: &ConditionValue) -> Option<Ordering> {
        use ConditionValue::*;

        match (self, other) {
            (Integer(a), Integer(b)) => Some(a.cmp(b)),
            (Integer(_) | Float(_) | String(_), Integer(_) | Float(_) | String(_)) => {
                match (self.as_f64(), other.as_f64()) {
                    (Some(a), Some(b)) => a.partial_cmp(&b),
                    _ => match (self, other) {
                        (String(a), String(b)) => Some(a.cmp(b)),
                        _ => None,
                    },
                }
            }
            _ => None,
        }
    }

    /// Flatten nested lists into their scalar members
    pub fn flatten(&self) -> Vec<&ConditionValue> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a ConditionValue>) {
        match self {
            ConditionValue::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
            other => out.push(other),
        }
    }

    /// Convert a JSON value into a condition value
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => ConditionValue::Null,
            JsonValue::Bool(b) => ConditionValue::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => ConditionValue::Integer(i),
                None => ConditionValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => ConditionValue::String(s.clone()),
            JsonValue::Array(items) => {
                ConditionValue::List(items.iter().map(ConditionValue::from_json).collect())
            }
            JsonValue::Object(map) => ConditionValue::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), ConditionValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert into a JSON value
    ///
    /// Fails for callables and non-finite floats, which have no JSON form.
    pub fn to_json(&self) -> Result<JsonValue> {
        Ok(match self {
            ConditionValue::Null => JsonValue::Null,
            ConditionValue::Bool(b) => JsonValue::Bool(*b),
            ConditionValue::Integer(i) => JsonValue::Number((*i).into()),
            ConditionValue::Float(f) => Number::from_f64(*f).map(JsonValue::Number).ok_or_else(
                || FieldsError::UnserializableCondition(format!("non-finite number {}", f)),
            )?,
            ConditionValue::String(s) => JsonValue::String(s.clone()),
            ConditionValue::List(items) => JsonValue::Array(
                items
                    .iter()
                    .map(ConditionValue::to_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            ConditionValue::Map(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key.clone(), value.to_json()?);
                }
                JsonValue::Object(out)
            }
            ConditionValue::Callback(_) => {
                return Err(FieldsError::UnserializableCondition(
                    "callable values cannot be serialized".to_string(),
                ))
            }
        })
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Null => write!(f, "null"),
            ConditionValue::Bool(b) => write!(f, "{}", b),
            ConditionValue::Integer(i) => write!(f, "{}", i),
            ConditionValue::Float(n) => write!(f, "{}", n),
            ConditionValue::String(s) => write!(f, "\"{}\"", s),
            ConditionValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ConditionValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            ConditionValue::Callback(_) => write!(f, "<callback>"),
        }
    }
}

impl From<bool> for ConditionValue {
    fn from(value: bool) -> Self {
        ConditionValue::Bool(value)
    }
}

impl From<i32> for ConditionValue {
    fn from(value: i32) -> Self {
        ConditionValue::Integer(value.into())
    }
}

impl From<i64> for ConditionValue {
    fn from(value: i64) -> Self {
        ConditionValue::Integer(value)
    }
}

impl From<u32> for ConditionValue {
    fn from(value: u32) -> Self {
        ConditionValue::Integer(value.into())
    }
}

impl From<f64> for ConditionValue {
    fn from(value: f64) -> Self {
        ConditionValue::Float(value)
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::String(value.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(value: String) -> Self {
        ConditionValue::String(value)
    }
}

impl<T: Into<ConditionValue>> From<Vec<T>> for ConditionValue {
    fn from(values: Vec<T>) -> Self {
        ConditionValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ConditionValue>> From<Option<T>> for ConditionValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConditionValue::Null, Into::into)
    }
}

impl From<&JsonValue> for ConditionValue {
    fn from(value: &JsonValue) -> Self {
        ConditionValue::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_strings_compare_loosely() {
        assert!(ConditionValue::from("1").loose_eq(&ConditionValue::from(1)));
        assert!(ConditionValue::from(2).loose_eq(&ConditionValue::from(2.0)));
        assert!(!ConditionValue::from("page").loose_eq(&ConditionValue::from(0)));
        assert!(!ConditionValue::from("page").loose_eq(&ConditionValue::from("post")));
    }

    #[test]
    fn test_loose_cmp() {
        let five = ConditionValue::from(5);
        assert_eq!(five.loose_cmp(&ConditionValue::from("10")), Some(Ordering::Less));
        assert_eq!(
            ConditionValue::from("b").loose_cmp(&ConditionValue::from("a")),
            Some(Ordering::Greater)
        );
        assert_eq!(five.loose_cmp(&ConditionValue::Null), None);
    }

    #[test]
    fn test_flatten_nested_lists() {
        let value = ConditionValue::from(vec![
            ConditionValue::from(1),
            ConditionValue::from(vec![2, 3]),
        ]);
        let flat: Vec<_> = value.flatten().into_iter().cloned().collect();
        assert_eq!(
            flat,
            vec![
                ConditionValue::from(1),
                ConditionValue::from(2),
                ConditionValue::from(3)
            ]
        );
    }

    #[test]
    fn test_map_keeps_document_key_order() {
        let json = json!({"value": "news", "field": "slug", "taxonomy": "category"});
        let value = ConditionValue::from_json(&json);
        assert_eq!(
            serde_json::to_string(&value.to_json().unwrap()).unwrap(),
            r#"{"value":"news","field":"slug","taxonomy":"category"}"#
        );

        let reordered =
            ConditionValue::from_json(&json!({"field": "slug", "taxonomy": "category", "value": "news"}));
        assert_eq!(value, reordered);
        assert!(value.loose_eq(&reordered));
    }

    #[test]
    fn test_json_conversion_keeps_integers() {
        let json = json!({"field": "slug", "value": [1, 2.5, "x"], "taxonomy": null});
        let value = ConditionValue::from_json(&json);
        match &value {
            ConditionValue::Map(map) => {
                assert_eq!(map["field"], ConditionValue::from("slug"));
                assert_eq!(
                    map["value"],
                    ConditionValue::List(vec![
                        ConditionValue::Integer(1),
                        ConditionValue::Float(2.5),
                        ConditionValue::from("x"),
                    ])
                );
            }
            other => panic!("Expected map, got {:?}", other),
        }
        assert_eq!(value.to_json().unwrap()["value"], json!([1, 2.5, "x"]));
    }

    #[test]
    fn test_callback_has_no_json_form() {
        let value = ConditionValue::callback(|_| true);
        assert!(value.contains_callback());
        assert!(matches!(
            value.to_json(),
            Err(FieldsError::UnserializableCondition(_))
        ));
        assert!(matches!(
            ConditionValue::Float(f64::INFINITY).to_json(),
            Err(FieldsError::UnserializableCondition(_))
        ));
    }
}
