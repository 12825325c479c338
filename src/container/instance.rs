//! A field container and its display conditions

use crate::condition::{normalize_type, ConditionFactory, ConditionValue, EvaluationContext};
use crate::container::kind::ContainerKind;
use crate::error::{FieldsError, Result};
use crate::foreign::{self, ForeignNode};
use crate::fulfillable::{
    ArrayTranslator, FulfillableCollection, JsonTranslator, Relation, Translator,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// A group of fields shown when its conditions are fulfilled
#[derive(Debug, Clone)]
pub struct Container {
    id: String,
    title: String,
    kind: ContainerKind,
    factory: Arc<ConditionFactory>,
    conditions: FulfillableCollection,
    /// Registered types allowed on top of the kind's own lists
    extra_static: Vec<String>,
    extra_dynamic: Vec<String>,
}

impl Container {
    /// Container using the process-wide factory
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: ContainerKind) -> Self {
        Self::with_factory(id, title, kind, crate::factory())
    }

    pub fn with_factory(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: ContainerKind,
        factory: Arc<ConditionFactory>,
    ) -> Self {
        let conditions = FulfillableCollection::new(Arc::clone(&factory));
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            factory,
            conditions,
            extra_static: Vec::new(),
            extra_dynamic: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn conditions(&self) -> &FulfillableCollection {
        &self.conditions
    }

    /// Allow extra condition types decided server-side
    ///
    /// Names are normalized; each must be registered on the factory.
    pub fn add_static_types<I, S>(&mut self, condition_types: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = self.registered_names(condition_types)?;
        self.extra_static.extend(names);
        Ok(self)
    }

    /// Allow extra condition types decided by the editor
    pub fn add_dynamic_types<I, S>(&mut self, condition_types: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = self.registered_names(condition_types)?;
        self.extra_dynamic.extend(names);
        Ok(self)
    }

    fn registered_names<I, S>(&self, condition_types: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        condition_types
            .into_iter()
            .map(|condition_type| {
                let condition_type = condition_type.as_ref();
                if self.factory.contains(condition_type) {
                    Ok(normalize_type(condition_type))
                } else {
                    Err(FieldsError::InvalidConditionType(condition_type.to_string()))
                }
            })
            .collect()
    }

    pub fn is_static(&self, condition_type: &str) -> bool {
        self.kind.is_static(condition_type) || self.extra_static.iter().any(|t| t == condition_type)
    }

    pub fn is_dynamic(&self, condition_type: &str) -> bool {
        self.kind.is_dynamic(condition_type)
            || self.extra_dynamic.iter().any(|t| t == condition_type)
    }

    /// Accepts any spelling `normalize_type` folds to an allowed type
    pub fn supports(&self, condition_type: &str) -> bool {
        let name = normalize_type(condition_type);
        self.is_static(&name) || self.is_dynamic(&name)
    }

    pub fn when(
        &mut self,
        condition_type: &str,
        operator: &str,
        value: impl Into<ConditionValue>,
    ) -> Result<&mut Self> {
        self.check_type(condition_type)?;
        self.conditions.when(condition_type, operator, value)?;
        Ok(self)
    }

    pub fn or_when(
        &mut self,
        condition_type: &str,
        operator: &str,
        value: impl Into<ConditionValue>,
    ) -> Result<&mut Self> {
        self.check_type(condition_type)?;
        self.conditions.or_when(condition_type, operator, value)?;
        Ok(self)
    }

    pub fn when_group<F>(&mut self, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut FulfillableCollection) -> Result<()>,
    {
        self.push_group(Relation::And, build)
    }

    pub fn or_when_group<F>(&mut self, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut FulfillableCollection) -> Result<()>,
    {
        self.push_group(Relation::Or, build)
    }

    fn push_group<F>(&mut self, connective: Relation, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut FulfillableCollection) -> Result<()>,
    {
        let mut group = FulfillableCollection::new(Arc::clone(&self.factory));
        build(&mut group)?;
        self.check_collection(&group)?;
        self.conditions.push(connective, group);
        Ok(self)
    }

    /// Whether the container is shown for this request
    ///
    /// Only static conditions are decided here. Dynamic ones are pruned from
    /// the tree and left to the editor.
    pub fn is_active(&self, ctx: &dyn EvaluationContext) -> bool {
        let active = self
            .conditions
            .filter(|condition_type| self.is_static(condition_type))
            .evaluate(ctx);
        tracing::debug!(container = %self.id, active, "Evaluated static conditions");
        active
    }

    /// Dynamic conditions in the client-side format
    pub fn client_conditions(&self) -> Result<JsonValue> {
        let dynamic = self
            .conditions
            .filter(|condition_type| self.is_dynamic(condition_type));
        JsonTranslator::new(Arc::clone(&self.factory)).fulfillable_to_foreign(&dynamic.into())
    }

    /// All conditions in the host's array form
    pub fn conditions_to_foreign(&self) -> Result<ForeignNode> {
        ArrayTranslator::new(Arc::clone(&self.factory)).collection_to_foreign(&self.conditions)
    }

    /// Replace the conditions with a foreign tree
    ///
    /// Nothing is replaced when any part of the tree is invalid.
    pub fn load_conditions(&mut self, foreign: &ForeignNode) -> Result<()> {
        let conditions =
            ArrayTranslator::new(Arc::clone(&self.factory)).foreign_to_collection(foreign)?;
        self.check_collection(&conditions)?;
        tracing::debug!(
            container = %self.id,
            conditions = conditions.len(),
            "Loaded conditions"
        );
        self.conditions = conditions;
        Ok(())
    }

    /// Replace the conditions with a persisted JSON document
    pub fn load_conditions_json(&mut self, json: &str) -> Result<()> {
        let foreign = foreign::get_or_parse(json)?;
        self.load_conditions(&foreign)
    }

    fn check_type(&self, condition_type: &str) -> Result<()> {
        if self.supports(condition_type) {
            Ok(())
        } else {
            Err(FieldsError::InvalidConditionType(format!(
                "{} is not available for {} containers",
                normalize_type(condition_type),
                self.kind
            )))
        }
    }

    fn check_collection(&self, collection: &FulfillableCollection) -> Result<()> {
        collection
            .condition_types()
            .into_iter()
            .try_for_each(|condition_type| self.check_type(condition_type))
    }
}
