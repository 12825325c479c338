//! Condition factory - registry of condition type constructors

use crate::condition::single::Condition;
use crate::condition::types::builtins;
use crate::error::{FieldsError, Result};
use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Zero-argument constructor for one condition type
pub type ConditionConstructor = Arc<dyn Fn() -> Result<Condition> + Send + Sync>;

static SEPARATOR_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[_\s]+").expect("separator pattern is valid"));
static EDGE_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^_|_$").expect("edge pattern is valid"));

/// Normalize a type name: collapse spaces and underscores, trim edges, lowercase
///
/// `"Post Type"`, `" post__type_"` and `"post_type"` all normalize to `"post_type"`.
pub fn normalize_type(name: &str) -> String {
    let collapsed = SEPARATOR_RUNS.replace_all(name, "_");
    EDGE_SEPARATORS.replace_all(&collapsed, "").to_lowercase()
}

/// Maps condition type names to constructors
#[derive(Clone, Default)]
pub struct ConditionFactory {
    constructors: AHashMap<String, ConditionConstructor>,
}

impl ConditionFactory {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in condition types
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        for builtin in builtins() {
            factory
                .constructors
                .insert(builtin.name.to_string(), Arc::new(move || builtin.build()));
        }
        factory
    }

    /// Register (or replace) the constructor for a condition type
    ///
    /// The constructor is run once; its error is returned as is.
    pub fn register<F>(&mut self, condition_type: &str, constructor: F) -> Result<()>
    where
        F: Fn() -> Result<Condition> + Send + Sync + 'static,
    {
        let name = normalize_type(condition_type);
        if name.is_empty() {
            return Err(FieldsError::InvalidConditionType(condition_type.to_string()));
        }
        constructor()?;

        tracing::debug!("Registering condition type {}", name);
        self.constructors.insert(name, Arc::new(constructor));
        Ok(())
    }

    pub fn contains(&self, condition_type: &str) -> bool {
        self.constructors.contains_key(&normalize_type(condition_type))
    }

    /// Build a fresh condition of the given type
    pub fn make(&self, condition_type: &str) -> Result<Condition> {
        let name = normalize_type(condition_type);
        self.constructors
            .get(&name)
            .ok_or_else(|| FieldsError::InvalidConditionType(condition_type.to_string()))
            .and_then(|constructor| constructor())
    }

    /// Registered type names, sorted
    pub fn types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl fmt::Debug for ConditionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionFactory")
            .field("types", &self.types())
            .finish()
    }
}
