//! Evaluation context
//!
//! The host application supplies one context per request. Condition types
//! query it by fact name for the actual value they compare against.

use crate::condition::value::ConditionValue;
use ahash::AHashMap;
use std::collections::HashMap;

/// Read-only source of request facts
pub trait EvaluationContext {
    /// Look up a fact by name; `None` when the request has no such fact
    fn fact(&self, name: &str) -> Option<ConditionValue>;
}

/// Map-backed context for a single request
///
/// Built-in condition types read facts named after themselves
/// (`post_type`, `current_user_role`, ...). Level and ancestor conditions read
/// the ancestor lists `post_ancestors` and `term_ancestors`.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    facts: AHashMap<String, ConditionValue>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fact, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ConditionValue>) {
        self.facts.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl EvaluationContext for RequestContext {
    #[inline]
    fn fact(&self, name: &str) -> Option<ConditionValue> {
        self.facts.get(name).cloned()
    }
}

impl EvaluationContext for HashMap<String, ConditionValue> {
    fn fact(&self, name: &str) -> Option<ConditionValue> {
        self.get(name).cloned()
    }
}

impl<C: EvaluationContext + ?Sized> EvaluationContext for &C {
    fn fact(&self, name: &str) -> Option<ConditionValue> {
        (**self).fact(name)
    }
}
