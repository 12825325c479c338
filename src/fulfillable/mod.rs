//! Fulfillable condition trees
//!
//! A `FulfillableCollection` is an AND/OR node owning conditions and nested
//! collections. Translators convert trees to the host's condition arrays and
//! to the client-side JSON format.

mod collection;
mod json;
mod relation;
mod translator;

#[cfg(test)]
mod property_tests;

pub use collection::{Fulfillable, FulfillableCollection};
pub use json::{JsonTranslator, CONDITIONS_KEY};
pub use relation::Relation;
pub use translator::{ArrayTranslator, Translator};
