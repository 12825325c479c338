//! Configuration module for container definitions
//!
//! Containers are declared as a JSON list:
//!
//! ```json
//! [{ "id": "crb_page_settings", "title": "Page Settings", "type": "post_meta",
//!    "conditions": { "relation": "AND", "0": { "type": "post_type", "value": "page" } } }]
//! ```

mod container;

pub use container::*;

use crate::condition::ConditionFactory;
use crate::container::Container;
use crate::error::{FieldsError, Result};
use crate::foreign::ForeignNode;
use std::sync::Arc;

/// Deserialize container definitions
pub fn deserialize_containers(json: &str) -> Result<Vec<ContainerConfig>> {
    serde_json::from_str(json).map_err(|e| FieldsError::DeserializationError(e.to_string()))
}

/// Build a container from its definition
pub fn build_container(config: &ContainerConfig, factory: Arc<ConditionFactory>) -> Result<Container> {
    let mut container = Container::with_factory(&config.id, config.title(), config.kind, factory);
    container
        .add_static_types(&config.static_types)?
        .add_dynamic_types(&config.dynamic_types)?;
    if let Some(conditions) = &config.conditions {
        let foreign = ForeignNode::from_json(conditions)?;
        container.load_conditions(&foreign)?;
    }
    Ok(container)
}

/// Load and validate every container of a JSON document
///
/// Fails on the first invalid container; nothing is returned in that case.
pub fn load_containers(json: &str, factory: Arc<ConditionFactory>) -> Result<Vec<Container>> {
    let configs = deserialize_containers(json)?;
    let containers = configs
        .iter()
        .map(|config| build_container(config, Arc::clone(&factory)))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!("Loaded {} containers", containers.len());
    Ok(containers)
}
