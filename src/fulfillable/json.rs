//! Client-side condition format
//!
//! The editor evaluates dynamic conditions in the browser and expects
//! explicit lists instead of positional keys:
//!
//! ```json
//! { "relation": "AND",
//!   "conditions": [ { "type": "post_format", "compare": "=", "value": "video" } ] }
//! ```

use crate::condition::{Condition, ConditionFactory};
use crate::error::{FieldsError, Result};
use crate::foreign::{COMPARE_KEY, MAX_NESTING_DEPTH, RELATION_KEY, TYPE_KEY, VALUE_KEY};
use crate::fulfillable::collection::{Fulfillable, FulfillableCollection};
use crate::fulfillable::relation::Relation;
use crate::fulfillable::translator::{condition_parts, make_condition, Translator};
use serde_json::{json, Map, Value as JsonValue};
use std::sync::Arc;

pub const CONDITIONS_KEY: &str = "conditions";

/// Translator for the client-side JSON format
#[derive(Debug, Clone)]
pub struct JsonTranslator {
    factory: Arc<ConditionFactory>,
}

impl JsonTranslator {
    pub fn new(factory: Arc<ConditionFactory>) -> Self {
        Self { factory }
    }

    fn collection_to_json(&self, collection: &FulfillableCollection) -> Result<JsonValue> {
        let mixed = collection.has_mixed_connectives();
        let mut conditions = Vec::with_capacity(collection.len());

        for (connective, child) in collection.entries() {
            let node = self.fulfillable_to_foreign(child)?;
            conditions.push(if mixed {
                json!({ RELATION_KEY: connective.as_str(), CONDITIONS_KEY: [node] })
            } else {
                node
            });
        }

        Ok(json!({
            RELATION_KEY: collection.relation().as_str(),
            CONDITIONS_KEY: conditions,
        }))
    }

    fn parse(&self, json: &JsonValue, depth: usize) -> Result<Fulfillable> {
        if depth > MAX_NESTING_DEPTH {
            return Err(FieldsError::MalformedCondition(format!(
                "conditions nested deeper than {} levels",
                MAX_NESTING_DEPTH
            )));
        }

        let object = json.as_object().ok_or_else(|| {
            FieldsError::MalformedCondition(format!("expected an object, found {}", json))
        })?;

        if object.contains_key(TYPE_KEY) {
            return self.parse_condition(object).map(Fulfillable::Condition);
        }

        let relation = match object.get(RELATION_KEY) {
            None => Relation::And,
            Some(JsonValue::String(token)) => Relation::parse(token)?,
            Some(other) => return Err(FieldsError::InvalidRelation(other.to_string())),
        };
        let children: &[JsonValue] = match object.get(CONDITIONS_KEY) {
            None => &[],
            Some(JsonValue::Array(children)) => children.as_slice(),
            Some(other) => {
                return Err(FieldsError::MalformedCondition(format!(
                    "`{}` must be a list, found {}",
                    CONDITIONS_KEY, other
                )))
            }
        };

        let mut collection = FulfillableCollection::new(Arc::clone(&self.factory));
        collection.set_relation(relation);
        for child in children {
            collection.push(relation, self.parse(child, depth + 1)?);
        }
        Ok(Fulfillable::Collection(collection))
    }

    fn parse_condition(&self, object: &Map<String, JsonValue>) -> Result<Condition> {
        let condition_type = match object.get(TYPE_KEY) {
            Some(JsonValue::String(name)) => name.as_str(),
            _ => {
                return Err(FieldsError::MalformedCondition(
                    "condition `type` must be a string".to_string(),
                ))
            }
        };
        let compare = match object.get(COMPARE_KEY) {
            None => "=",
            Some(JsonValue::String(compare)) => compare.as_str(),
            Some(other) => {
                return Err(FieldsError::MalformedCondition(format!(
                    "condition `compare` must be a string, found {}",
                    other
                )))
            }
        };
        let value = object.get(VALUE_KEY).unwrap_or(&JsonValue::Null);

        make_condition(&self.factory, condition_type, compare, value)
    }
}

impl Translator for JsonTranslator {
    type Foreign = JsonValue;

    fn fulfillable_to_foreign(&self, fulfillable: &Fulfillable) -> Result<JsonValue> {
        match fulfillable {
            Fulfillable::Condition(condition) => {
                let (condition_type, compare, value) = condition_parts(condition)?;
                Ok(json!({
                    TYPE_KEY: condition_type,
                    COMPARE_KEY: compare,
                    VALUE_KEY: value,
                }))
            }
            Fulfillable::Collection(collection) => self.collection_to_json(collection),
        }
    }

    fn foreign_to_fulfillable(&self, foreign: &JsonValue) -> Result<Fulfillable> {
        self.parse(foreign, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::RequestContext;

    fn translator() -> JsonTranslator {
        JsonTranslator::new(Arc::new(ConditionFactory::with_defaults()))
    }

    fn collection() -> FulfillableCollection {
        FulfillableCollection::new(Arc::new(ConditionFactory::with_defaults()))
    }

    #[test]
    fn test_collection_renders_condition_lists() {
        let mut fulfillable = collection();
        fulfillable.when("post_format", "=", "video").unwrap();
        fulfillable.when("post_parent_id", "!=", 0).unwrap();

        let received = translator()
            .fulfillable_to_foreign(&fulfillable.into())
            .unwrap();
        assert_eq!(
            serde_json::to_string(&received).unwrap(),
            serde_json::to_string(&json!({
                "relation": "AND",
                "conditions": [
                    {"type": "post_format", "compare": "=", "value": "video"},
                    {"type": "post_parent_id", "compare": "!=", "value": 0},
                ],
            }))
            .unwrap()
        );
    }

    #[test]
    fn test_mixed_connectives_are_wrapped() {
        let mut fulfillable = collection();
        fulfillable.when("post_format", "=", "video").unwrap();
        fulfillable.or_when("post_format", "=", "audio").unwrap();

        let received = translator()
            .fulfillable_to_foreign(&fulfillable.into())
            .unwrap();
        assert_eq!(
            received,
            json!({
                "relation": "OR",
                "conditions": [
                    {"relation": "AND", "conditions": [
                        {"type": "post_format", "compare": "=", "value": "video"},
                    ]},
                    {"relation": "OR", "conditions": [
                        {"type": "post_format", "compare": "=", "value": "audio"},
                    ]},
                ],
            })
        );
    }

    #[test]
    fn test_parse_client_format() {
        let mut expected = collection();
        expected.when("post_format", "=", "video").unwrap();
        expected
            .when_group(|c| {
                c.or_when("post_parent_id", "=", 0)?;
                c.or_when("post_parent_id", "IN", vec![1, 2])?;
                Ok(())
            })
            .unwrap();

        let received = translator()
            .foreign_to_fulfillable(&json!({
                "relation": "and",
                "conditions": [
                    {"type": "post_format", "value": "video"},
                    {"relation": "OR", "conditions": [
                        {"type": "post_parent_id", "compare": "=", "value": 0},
                        {"type": "post_parent_id", "compare": "IN", "value": [1, 2]},
                    ]},
                ],
            }))
            .unwrap();
        assert_eq!(received, Fulfillable::Collection(expected));

        let ctx = RequestContext::new()
            .with("post_format", "video")
            .with("post_parent_id", 2);
        assert!(received.evaluate(&ctx));
    }

    #[test]
    fn test_malformed_client_input() {
        let translator = translator();
        assert!(matches!(
            translator.foreign_to_fulfillable(&json!("post_format")),
            Err(FieldsError::MalformedCondition(_))
        ));
        assert!(matches!(
            translator.foreign_to_fulfillable(&json!({"relation": "AND", "conditions": {}})),
            Err(FieldsError::MalformedCondition(_))
        ));
        assert!(matches!(
            translator.foreign_to_fulfillable(&json!({"relation": 1})),
            Err(FieldsError::InvalidRelation(_))
        ));
        assert!(matches!(
            translator.foreign_to_fulfillable(&json!({"type": 7})),
            Err(FieldsError::MalformedCondition(_))
        ));
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let mut json = json!({"type": "post_id", "value": 1});
        for _ in 0..=MAX_NESTING_DEPTH + 1 {
            json = json!({"relation": "AND", "conditions": [json]});
        }
        assert!(matches!(
            translator().foreign_to_fulfillable(&json),
            Err(FieldsError::MalformedCondition(_))
        ));
    }
}
