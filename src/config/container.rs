//! Container configuration structures

use crate::container::ContainerKind;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Container definition
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerConfig {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: ContainerKind,
    /// Registered types allowed beyond the kind's own lists
    #[serde(default)]
    pub static_types: Vec<String>,
    #[serde(default)]
    pub dynamic_types: Vec<String>,
    /// Condition tree in the host's array form
    #[serde(default)]
    pub conditions: Option<JsonValue>,
}

impl ContainerConfig {
    /// Title, falling back to the id
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}
