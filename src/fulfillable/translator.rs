//! Translators between condition trees and foreign representations
//!
//! Conversion to foreign form is exact: the same tree always produces the
//! same array. Conversion back is logically equivalent but not always
//! structurally identical for nested collections. A node whose children were
//! added with mixed `when`/`or_when` calls renders each child wrapped in its
//! own single-child node carrying its connective; reading that back yields
//! the wrappers as nested collections, which evaluate the same way.

use crate::condition::{ComparisonOperator, Condition, ConditionFactory, ConditionValue};
use crate::error::{FieldsError, Result};
use crate::foreign::{ForeignCondition, ForeignNode};
use crate::fulfillable::collection::{Fulfillable, FulfillableCollection};
use crate::fulfillable::relation::Relation;
use std::sync::Arc;

/// Converts condition trees to and from one foreign representation
pub trait Translator {
    type Foreign;

    fn fulfillable_to_foreign(&self, fulfillable: &Fulfillable) -> Result<Self::Foreign>;

    fn foreign_to_fulfillable(&self, foreign: &Self::Foreign) -> Result<Fulfillable>;
}

/// Translator for the host's native condition arrays
#[derive(Debug, Clone)]
pub struct ArrayTranslator {
    factory: Arc<ConditionFactory>,
}

impl ArrayTranslator {
    pub fn new(factory: Arc<ConditionFactory>) -> Self {
        Self { factory }
    }

    pub fn condition_to_foreign(&self, condition: &Condition) -> Result<ForeignNode> {
        let (condition_type, compare, value) = condition_parts(condition)?;
        Ok(ForeignNode::Condition(ForeignCondition {
            condition_type,
            compare,
            value,
        }))
    }

    pub fn collection_to_foreign(&self, collection: &FulfillableCollection) -> Result<ForeignNode> {
        let mixed = collection.has_mixed_connectives();
        let mut children = Vec::with_capacity(collection.len());

        for (connective, child) in collection.entries() {
            let node = self.fulfillable_to_foreign(child)?;
            children.push(if mixed {
                ForeignNode::collection(connective.as_str(), vec![node])
            } else {
                node
            });
        }

        Ok(ForeignNode::collection(collection.relation().as_str(), children))
    }

    /// Read a foreign tree whose root must be a collection
    ///
    /// A lone condition at the root is placed in an AND collection.
    pub fn foreign_to_collection(&self, foreign: &ForeignNode) -> Result<FulfillableCollection> {
        match self.foreign_to_fulfillable(foreign)? {
            Fulfillable::Collection(collection) => Ok(collection),
            Fulfillable::Condition(condition) => {
                let mut collection = FulfillableCollection::new(Arc::clone(&self.factory));
                collection.push(Relation::And, condition);
                Ok(collection)
            }
        }
    }
}

impl Translator for ArrayTranslator {
    type Foreign = ForeignNode;

    fn fulfillable_to_foreign(&self, fulfillable: &Fulfillable) -> Result<ForeignNode> {
        match fulfillable {
            Fulfillable::Condition(condition) => self.condition_to_foreign(condition),
            Fulfillable::Collection(collection) => self.collection_to_foreign(collection),
        }
    }

    fn foreign_to_fulfillable(&self, foreign: &ForeignNode) -> Result<Fulfillable> {
        match foreign {
            ForeignNode::Condition(condition) => {
                tracing::trace!("Translating foreign condition {}", condition.condition_type);
                make_condition(
                    &self.factory,
                    &condition.condition_type,
                    &condition.compare,
                    &condition.value,
                )
                .map(Fulfillable::Condition)
            }
            ForeignNode::Collection { relation, children } => {
                let relation = Relation::from_foreign(relation.as_deref())?;
                let mut collection = FulfillableCollection::new(Arc::clone(&self.factory));
                collection.set_relation(relation);
                for child in children {
                    collection.push(relation, self.foreign_to_fulfillable(child)?);
                }
                Ok(Fulfillable::Collection(collection))
            }
        }
    }
}

/// Foreign parts of a condition: type, operator token, JSON value
pub(crate) fn condition_parts(
    condition: &Condition,
) -> Result<(String, String, serde_json::Value)> {
    if condition.comparison_operator() == ComparisonOperator::Custom
        || condition.value().contains_callback()
    {
        return Err(FieldsError::UnserializableCondition(format!(
            "{} uses a custom callback",
            condition.condition_type()
        )));
    }

    Ok((
        condition.condition_type().to_string(),
        condition.comparison_operator().as_str().to_string(),
        condition.value().to_json()?,
    ))
}

/// Build a condition from foreign parts
pub(crate) fn make_condition(
    factory: &ConditionFactory,
    condition_type: &str,
    compare: &str,
    value: &serde_json::Value,
) -> Result<Condition> {
    let mut condition = factory.make(condition_type)?;
    condition.set_comparison_operator_str(compare)?;
    if condition.comparison_operator() == ComparisonOperator::Custom {
        return Err(FieldsError::UnserializableCondition(format!(
            "{} cannot use a custom callback from foreign input",
            condition_type
        )));
    }
    condition.set_value(ConditionValue::from_json(value));
    Ok(condition)
}
