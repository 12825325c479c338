//! Typed foreign condition array
//!
//! The host's native condition syntax, as it appears in persisted
//! configuration:
//!
//! ```json
//! { "relation": "AND",
//!   "0": { "type": "post_type", "compare": "=", "value": "page" },
//!   "1": { "relation": "OR", "0": { ... }, "1": { ... } } }
//! ```

use crate::error::{FieldsError, Result};
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value as JsonValue};

/// Deepest nesting accepted from foreign input
pub const MAX_NESTING_DEPTH: usize = 64;

pub const RELATION_KEY: &str = "relation";
pub const TYPE_KEY: &str = "type";
pub const COMPARE_KEY: &str = "compare";
pub const VALUE_KEY: &str = "value";

/// Atomic condition entry
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignCondition {
    pub condition_type: String,
    pub compare: String,
    pub value: JsonValue,
}

impl ForeignCondition {
    pub fn new(
        condition_type: impl Into<String>,
        compare: impl Into<String>,
        value: impl Into<JsonValue>,
    ) -> Self {
        Self {
            condition_type: condition_type.into(),
            compare: compare.into(),
            value: value.into(),
        }
    }
}

/// A node of the foreign condition array
#[derive(Debug, Clone, PartialEq)]
pub enum ForeignNode {
    Condition(ForeignCondition),
    /// `relation` is kept verbatim; it is validated on translation
    Collection {
        relation: Option<String>,
        children: Vec<ForeignNode>,
    },
}

impl ForeignNode {
    pub fn condition(
        condition_type: impl Into<String>,
        compare: impl Into<String>,
        value: impl Into<JsonValue>,
    ) -> Self {
        ForeignNode::Condition(ForeignCondition::new(condition_type, compare, value))
    }

    pub fn collection(relation: impl Into<String>, children: Vec<ForeignNode>) -> Self {
        ForeignNode::Collection {
            relation: Some(relation.into()),
            children,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, ForeignNode::Collection { .. })
    }

    /// Parse a node from JSON
    ///
    /// Objects with a `relation` key, objects with only positional keys and
    /// arrays are collections; objects with a `type` key are conditions.
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        parse_node(json, 0)
    }

    /// Parse a node from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_json(&value)
    }

    /// Render as a JSON value, `relation` first and positional keys in order
    pub fn to_json(&self) -> JsonValue {
        match self {
            ForeignNode::Condition(condition) => {
                let mut map = Map::with_capacity(3);
                map.insert(
                    TYPE_KEY.to_string(),
                    JsonValue::String(condition.condition_type.clone()),
                );
                map.insert(
                    COMPARE_KEY.to_string(),
                    JsonValue::String(condition.compare.clone()),
                );
                map.insert(VALUE_KEY.to_string(), condition.value.clone());
                JsonValue::Object(map)
            }
            ForeignNode::Collection { relation, children } => {
                let mut map = Map::with_capacity(children.len() + 1);
                if let Some(relation) = relation {
                    map.insert(RELATION_KEY.to_string(), JsonValue::String(relation.clone()));
                }
                for (index, child) in children.iter().enumerate() {
                    map.insert(index.to_string(), child.to_json());
                }
                JsonValue::Object(map)
            }
        }
    }

    /// Compact JSON text of this node
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn parse_node(json: &JsonValue, depth: usize) -> Result<ForeignNode> {
    if depth > MAX_NESTING_DEPTH {
        return Err(FieldsError::MalformedCondition(format!(
            "conditions nested deeper than {} levels",
            MAX_NESTING_DEPTH
        )));
    }

    match json {
        JsonValue::Array(items) => Ok(ForeignNode::Collection {
            relation: None,
            children: items
                .iter()
                .map(|item| parse_node(item, depth + 1))
                .collect::<Result<Vec<_>>>()?,
        }),
        JsonValue::Object(map) => {
            if map.contains_key(RELATION_KEY) {
                parse_collection(map, depth)
            } else if map.contains_key(TYPE_KEY) {
                parse_condition(map)
            } else if !map.is_empty() && map.keys().all(|k| k.parse::<usize>().is_ok()) {
                parse_collection(map, depth)
            } else {
                Err(FieldsError::MalformedCondition(format!(
                    "node has neither a `{}` nor a `{}` key: {}",
                    RELATION_KEY, TYPE_KEY, json
                )))
            }
        }
        other => Err(FieldsError::MalformedCondition(format!(
            "expected a condition or collection, got {}",
            other
        ))),
    }
}

fn parse_collection(map: &Map<String, JsonValue>, depth: usize) -> Result<ForeignNode> {
    let relation = match map.get(RELATION_KEY) {
        None => None,
        Some(JsonValue::String(relation)) => Some(relation.clone()),
        Some(other) => return Err(FieldsError::InvalidRelation(other.to_string())),
    };

    let mut indexed = Vec::with_capacity(map.len());
    for (key, value) in map {
        if key == RELATION_KEY {
            continue;
        }
        // Only canonical indexes; "00" would collide with "0"
        let index = key
            .parse::<usize>()
            .ok()
            .filter(|index| index.to_string() == *key)
            .ok_or_else(|| {
                FieldsError::MalformedCondition(format!("unexpected key `{}` in collection", key))
            })?;
        indexed.push((index, parse_node(value, depth + 1)?));
    }
    indexed.sort_by_key(|(index, _)| *index);

    Ok(ForeignNode::Collection {
        relation,
        children: indexed.into_iter().map(|(_, node)| node).collect(),
    })
}

fn parse_condition(map: &Map<String, JsonValue>) -> Result<ForeignNode> {
    let condition_type = match map.get(TYPE_KEY) {
        Some(JsonValue::String(t)) if !t.trim().is_empty() => t.clone(),
        Some(other) => {
            return Err(FieldsError::MalformedCondition(format!(
                "condition `{}` must be a non-empty string, got {}",
                TYPE_KEY, other
            )))
        }
        None => {
            return Err(FieldsError::MalformedCondition(format!(
                "condition is missing `{}`",
                TYPE_KEY
            )))
        }
    };

    let compare = match map.get(COMPARE_KEY) {
        None => "=".to_string(),
        Some(JsonValue::String(compare)) => compare.clone(),
        Some(other) => {
            return Err(FieldsError::MalformedCondition(format!(
                "condition `{}` must be a string, got {}",
                COMPARE_KEY, other
            )))
        }
    };

    Ok(ForeignNode::Condition(ForeignCondition {
        condition_type,
        compare,
        value: map.get(VALUE_KEY).cloned().unwrap_or(JsonValue::Null),
    }))
}

impl Serialize for ForeignNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ForeignNode::Condition(condition) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry(TYPE_KEY, &condition.condition_type)?;
                map.serialize_entry(COMPARE_KEY, &condition.compare)?;
                map.serialize_entry(VALUE_KEY, &condition.value)?;
                map.end()
            }
            ForeignNode::Collection { relation, children } => {
                let len = children.len() + usize::from(relation.is_some());
                let mut map = serializer.serialize_map(Some(len))?;
                if let Some(relation) = relation {
                    map.serialize_entry(RELATION_KEY, relation)?;
                }
                for (index, child) in children.iter().enumerate() {
                    map.serialize_entry(&index.to_string(), child)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for ForeignNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        ForeignNode::from_json(&json).map_err(de::Error::custom)
    }
}
