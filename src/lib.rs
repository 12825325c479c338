//! Custom Fields Core - condition engine for field containers
//!
//! This crate decides where groups of custom fields are displayed. Containers
//! carry AND/OR trees of typed conditions ("post type is page", "current user
//! is an editor") that are evaluated against a request context and translated
//! to and from the host's persisted condition arrays.

pub mod condition;
pub mod config;
pub mod container;
pub mod error;
pub mod foreign;
pub mod fulfillable;

pub use crate::condition::{
    normalize_type, Comparator, ComparisonOperator, Condition, ConditionFactory, ConditionValue,
    EvaluationContext, RequestContext,
};
pub use crate::config::load_containers;
pub use crate::container::{Container, ContainerKind, ContainerRepository};
pub use crate::error::{FieldsError, Result};
pub use crate::foreign::{ForeignCondition, ForeignNode};
pub use crate::fulfillable::{
    ArrayTranslator, Fulfillable, FulfillableCollection, JsonTranslator, Relation, Translator,
};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

// ============================================================================
// Default Factory
// ============================================================================

/// Process-wide factory used by containers built without an explicit one
static FACTORY: Lazy<RwLock<Arc<ConditionFactory>>> =
    Lazy::new(|| RwLock::new(Arc::new(ConditionFactory::with_defaults())));

/// The process-wide condition factory
///
/// Starts with the built-in condition types.
pub fn factory() -> Arc<ConditionFactory> {
    Arc::clone(&FACTORY.read())
}

/// Replace the process-wide factory (call once at startup)
///
/// Containers created earlier keep the factory they were built with.
pub fn install_factory(factory: ConditionFactory) {
    tracing::debug!("Installing condition factory with {} types", factory.len());
    *FACTORY.write() = Arc::new(factory);
}
