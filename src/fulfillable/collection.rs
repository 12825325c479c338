//! Fulfillable collection - a node of the boolean condition tree

use crate::condition::{Condition, ConditionFactory, ConditionValue, EvaluationContext};
use crate::error::Result;
use crate::fulfillable::relation::Relation;
use std::fmt;
use std::sync::Arc;

/// Either an atomic condition or a nested collection
#[derive(Debug, Clone, PartialEq)]
pub enum Fulfillable {
    Condition(Condition),
    Collection(FulfillableCollection),
}

impl Fulfillable {
    pub fn evaluate(&self, ctx: &dyn EvaluationContext) -> bool {
        match self {
            Fulfillable::Condition(condition) => condition.evaluate(ctx),
            Fulfillable::Collection(collection) => collection.evaluate(ctx),
        }
    }

    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            Fulfillable::Condition(condition) => Some(condition),
            Fulfillable::Collection(_) => None,
        }
    }

    pub fn as_collection(&self) -> Option<&FulfillableCollection> {
        match self {
            Fulfillable::Collection(collection) => Some(collection),
            Fulfillable::Condition(_) => None,
        }
    }
}

impl From<Condition> for Fulfillable {
    fn from(condition: Condition) -> Self {
        Fulfillable::Condition(condition)
    }
}

impl From<FulfillableCollection> for Fulfillable {
    fn from(collection: FulfillableCollection) -> Self {
        Fulfillable::Collection(collection)
    }
}

/// A child together with the connective (`when` / `or_when`) that added it
#[derive(Debug, Clone)]
struct Entry {
    connective: Relation,
    fulfillable: Fulfillable,
}

/// AND/OR node owning an ordered list of children
///
/// The relation belongs to the node: `or_when` switches the whole node to
/// OR. The connective of each call is remembered only so translators can
/// describe mixed `when`/`or_when` nodes.
#[derive(Clone)]
pub struct FulfillableCollection {
    factory: Arc<ConditionFactory>,
    relation: Relation,
    entries: Vec<Entry>,
}

impl FulfillableCollection {
    pub fn new(factory: Arc<ConditionFactory>) -> Self {
        Self {
            factory,
            relation: Relation::And,
            entries: Vec::new(),
        }
    }

    pub fn factory(&self) -> &Arc<ConditionFactory> {
        &self.factory
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn set_relation(&mut self, relation: Relation) {
        self.relation = relation;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn children(&self) -> impl Iterator<Item = &Fulfillable> {
        self.entries.iter().map(|entry| &entry.fulfillable)
    }

    /// Children with the connective each was added with
    pub fn entries(&self) -> impl Iterator<Item = (Relation, &Fulfillable)> {
        self.entries
            .iter()
            .map(|entry| (entry.connective, &entry.fulfillable))
    }

    /// True when children were added with both `when` and `or_when`
    pub fn has_mixed_connectives(&self) -> bool {
        let mut connectives = self.entries.iter().map(|entry| entry.connective);
        match connectives.next() {
            Some(first) => connectives.any(|c| c != first),
            None => false,
        }
    }

    /// Append a child; an OR connective switches this node to OR
    pub fn push(&mut self, connective: Relation, fulfillable: impl Into<Fulfillable>) -> &mut Self {
        if connective == Relation::Or {
            self.relation = Relation::Or;
        }
        self.entries.push(Entry {
            connective,
            fulfillable: fulfillable.into(),
        });
        self
    }

    /// Append a condition built by the factory
    pub fn when(
        &mut self,
        condition_type: &str,
        operator: &str,
        value: impl Into<ConditionValue>,
    ) -> Result<&mut Self> {
        let condition = self.make_condition(condition_type, operator, value)?;
        Ok(self.push(Relation::And, condition))
    }

    /// Append a condition and switch this node to OR
    pub fn or_when(
        &mut self,
        condition_type: &str,
        operator: &str,
        value: impl Into<ConditionValue>,
    ) -> Result<&mut Self> {
        let condition = self.make_condition(condition_type, operator, value)?;
        Ok(self.push(Relation::Or, condition))
    }

    /// Append a nested collection populated by `build`
    pub fn when_group<F>(&mut self, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut FulfillableCollection) -> Result<()>,
    {
        let group = self.build_group(build)?;
        Ok(self.push(Relation::And, group))
    }

    /// Append a nested collection populated by `build` and switch this node to OR
    pub fn or_when_group<F>(&mut self, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut FulfillableCollection) -> Result<()>,
    {
        let group = self.build_group(build)?;
        Ok(self.push(Relation::Or, group))
    }

    fn make_condition(
        &self,
        condition_type: &str,
        operator: &str,
        value: impl Into<ConditionValue>,
    ) -> Result<Condition> {
        let mut condition = self.factory.make(condition_type)?;
        condition.set_comparison_operator_str(operator)?;
        condition.set_value(value);
        Ok(condition)
    }

    fn build_group<F>(&self, build: F) -> Result<FulfillableCollection>
    where
        F: FnOnce(&mut FulfillableCollection) -> Result<()>,
    {
        let mut group = FulfillableCollection::new(Arc::clone(&self.factory));
        build(&mut group)?;
        Ok(group)
    }

    /// Evaluate the tree; an empty collection is fulfilled for either relation
    pub fn evaluate(&self, ctx: &dyn EvaluationContext) -> bool {
        let mut children = self.children();
        match self.relation {
            Relation::And => children.all(|child| child.evaluate(ctx)),
            Relation::Or => {
                self.entries.is_empty() || children.any(|child| child.evaluate(ctx))
            }
        }
    }

    /// Copy of the tree keeping only conditions whose type passes `keep`
    ///
    /// Sub-collections left empty by the pruning are dropped.
    pub fn filter<P>(&self, keep: P) -> FulfillableCollection
    where
        P: Fn(&str) -> bool,
    {
        self.filter_by(&keep)
    }

    fn filter_by(&self, keep: &dyn Fn(&str) -> bool) -> FulfillableCollection {
        let mut filtered = FulfillableCollection::new(Arc::clone(&self.factory));
        filtered.relation = self.relation;

        for entry in &self.entries {
            let kept = match &entry.fulfillable {
                Fulfillable::Condition(condition) => {
                    keep(condition.condition_type()).then(|| entry.fulfillable.clone())
                }
                Fulfillable::Collection(collection) => {
                    let pruned = collection.filter_by(keep);
                    (!pruned.is_empty()).then(|| Fulfillable::Collection(pruned))
                }
            };
            if let Some(fulfillable) = kept {
                filtered.entries.push(Entry {
                    connective: entry.connective,
                    fulfillable,
                });
            }
        }

        filtered
    }

    /// Every condition in the tree, depth-first
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        for child in self.children() {
            match child {
                Fulfillable::Condition(condition) => out.push(condition),
                Fulfillable::Collection(collection) => collection.collect_conditions(out),
            }
        }
    }

    /// Distinct condition types used in the tree, in order of appearance
    pub fn condition_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for condition in self.conditions() {
            if !types.contains(&condition.condition_type()) {
                types.push(condition.condition_type());
            }
        }
        types
    }
}

/// Same relation and pairwise equal children, in order
impl PartialEq for FulfillableCollection {
    fn eq(&self, other: &Self) -> bool {
        self.relation == other.relation
            && self.entries.len() == other.entries.len()
            && self.children().zip(other.children()).all(|(a, b)| a == b)
    }
}

impl fmt::Debug for FulfillableCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FulfillableCollection")
            .field("relation", &self.relation)
            .field("children", &self.entries)
            .finish()
    }
}
