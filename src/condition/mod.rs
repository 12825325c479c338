//! Condition module
//!
//! Atomic conditions, the comparators they bind to, the evaluation context
//! they read from and the factory that builds them by type name.

mod comparator;
mod context;
pub mod factory;
mod operator;
mod single;
pub mod types;
mod value;


pub use comparator::*;
pub use context::*;
pub use factory::{normalize_type, ConditionConstructor, ConditionFactory};
pub use operator::*;
pub use single::*;
pub use types::{AncestorLevel, ContextFact};
pub use value::*;
