//! Built-in condition types
//!
//! Every type resolves its actual value from a named context fact. Level
//! types derive the nesting level from an ancestor list instead.

use crate::condition::comparator::Comparator;
use crate::condition::context::EvaluationContext;
use crate::condition::single::{Condition, ConditionKind};
use crate::condition::value::ConditionValue;
use crate::error::Result;
use std::borrow::Cow;

/// Reads one fact from the context; missing facts resolve to null
#[derive(Debug, Clone)]
pub struct ContextFact {
    fact: Cow<'static, str>,
}

impl ContextFact {
    pub fn new(fact: impl Into<Cow<'static, str>>) -> Self {
        Self { fact: fact.into() }
    }
}

impl ConditionKind for ContextFact {
    #[inline]
    fn actual_value(&self, ctx: &dyn EvaluationContext) -> ConditionValue {
        ctx.fact(&self.fact).unwrap_or_default()
    }
}

/// Nesting level of an object: its ancestor count plus one
#[derive(Debug, Clone)]
pub struct AncestorLevel {
    ancestors_fact: &'static str,
}

impl AncestorLevel {
    pub fn new(ancestors_fact: &'static str) -> Self {
        Self { ancestors_fact }
    }
}

impl ConditionKind for AncestorLevel {
    fn actual_value(&self, ctx: &dyn EvaluationContext) -> ConditionValue {
        let ancestors = match ctx.fact(self.ancestors_fact) {
            Some(ConditionValue::List(items)) => items.len(),
            Some(ConditionValue::Null) | None => 0,
            Some(_) => 1,
        };
        ConditionValue::Integer(ancestors as i64 + 1)
    }
}

// Comparator sets shared by the catalogue
const IDENTIFIER: &[Comparator] = &[
    Comparator::Equality,
    Comparator::Contain,
    Comparator::Scalar,
    Comparator::Custom,
];
const NAMED: &[Comparator] = &[Comparator::Equality, Comparator::Contain, Comparator::Custom];
const MEMBERSHIP: &[Comparator] = &[Comparator::Contain, Comparator::Custom];

/// How a built-in type obtains its actual value
#[derive(Debug, Clone, Copy)]
enum Source {
    Fact(&'static str),
    Level(&'static str),
}

/// Catalogue entry for a built-in condition type
#[derive(Debug, Clone, Copy)]
pub struct BuiltinType {
    pub name: &'static str,
    comparators: &'static [Comparator],
    source: Source,
}

impl BuiltinType {
    const fn new(name: &'static str, comparators: &'static [Comparator], source: Source) -> Self {
        Self {
            name,
            comparators,
            source,
        }
    }

    pub fn build(&self) -> Result<Condition> {
        let comparators = self.comparators.iter().copied();
        match self.source {
            Source::Fact(fact) => Condition::new(self.name, comparators, ContextFact::new(fact)),
            Source::Level(fact) => Condition::new(self.name, comparators, AncestorLevel::new(fact)),
        }
    }
}

const BUILTIN: &[BuiltinType] = &[
    BuiltinType::new("post_id", IDENTIFIER, Source::Fact("post_id")),
    BuiltinType::new("post_parent_id", IDENTIFIER, Source::Fact("post_parent_id")),
    BuiltinType::new("post_ancestor_id", MEMBERSHIP, Source::Fact("post_ancestors")),
    BuiltinType::new("post_type", NAMED, Source::Fact("post_type")),
    BuiltinType::new("post_format", NAMED, Source::Fact("post_format")),
    BuiltinType::new("post_level", IDENTIFIER, Source::Level("post_ancestors")),
    BuiltinType::new("post_template", NAMED, Source::Fact("post_template")),
    BuiltinType::new("post_term", MEMBERSHIP, Source::Fact("post_term")),
    BuiltinType::new("term", NAMED, Source::Fact("term")),
    BuiltinType::new("term_taxonomy", NAMED, Source::Fact("term_taxonomy")),
    BuiltinType::new("term_level", IDENTIFIER, Source::Level("term_ancestors")),
    BuiltinType::new("term_parent", IDENTIFIER, Source::Fact("term_parent")),
    BuiltinType::new("term_ancestor", MEMBERSHIP, Source::Fact("term_ancestors")),
    BuiltinType::new("user_id", IDENTIFIER, Source::Fact("user_id")),
    BuiltinType::new("user_role", MEMBERSHIP, Source::Fact("user_role")),
    BuiltinType::new("user_capability", MEMBERSHIP, Source::Fact("user_capability")),
    BuiltinType::new("current_user_id", IDENTIFIER, Source::Fact("current_user_id")),
    BuiltinType::new("current_user_role", MEMBERSHIP, Source::Fact("current_user_role")),
    BuiltinType::new(
        "current_user_capability",
        MEMBERSHIP,
        Source::Fact("current_user_capability"),
    ),
    BuiltinType::new("blog_id", IDENTIFIER, Source::Fact("blog_id")),
];

/// The built-in condition catalogue
pub fn builtins() -> &'static [BuiltinType] {
    BUILTIN
}

/// Construct a built-in condition by name
pub fn make_builtin(name: &str) -> Option<Condition> {
    BUILTIN
        .iter()
        .find(|b| b.name == name)
        .and_then(|b| b.build().ok())
}
