//! Registry of containers by id

use crate::condition::EvaluationContext;
use crate::container::instance::Container;
use crate::error::{FieldsError, Result};
use ahash::AHashMap;

/// Containers in registration order, unique by id
#[derive(Debug, Clone, Default)]
pub struct ContainerRepository {
    containers: Vec<Container>,
    index: AHashMap<String, usize>,
}

impl ContainerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a container; ids must be unique
    pub fn register(&mut self, container: Container) -> Result<&mut Container> {
        if self.index.contains_key(container.id()) {
            return Err(FieldsError::DuplicateContainer(container.id().to_string()));
        }

        tracing::debug!(container = %container.id(), kind = %container.kind(), "Registering container");
        let position = self.containers.len();
        self.index.insert(container.id().to_string(), position);
        self.containers.push(container);
        Ok(&mut self.containers[position])
    }

    pub fn get(&self, id: &str) -> Option<&Container> {
        self.index.get(id).map(|&i| &self.containers[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Container> {
        self.index.get(id).map(|&i| &mut self.containers[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Container> {
        self.containers.iter()
    }

    /// Containers whose static conditions hold for `ctx`
    pub fn active(&self, ctx: &dyn EvaluationContext) -> Vec<&Container> {
        self.containers
            .iter()
            .filter(|container| container.is_active(ctx))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{ConditionFactory, RequestContext};
    use crate::container::kind::ContainerKind;
    use std::sync::Arc;

    fn container(id: &str, kind: ContainerKind) -> Container {
        Container::with_factory(id, id, kind, Arc::new(ConditionFactory::with_defaults()))
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut repository = ContainerRepository::new();
        repository.register(container("crb_options", ContainerKind::ThemeOptions)).unwrap();

        assert_eq!(
            repository
                .register(container("crb_options", ContainerKind::Network))
                .unwrap_err(),
            FieldsError::DuplicateContainer("crb_options".to_string())
        );
        assert_eq!(repository.len(), 1);
        assert_eq!(repository.get("crb_options").unwrap().kind(), ContainerKind::ThemeOptions);
    }

    #[test]
    fn test_active_containers() {
        let mut repository = ContainerRepository::new();
        repository
            .register(container("crb_pages", ContainerKind::PostMeta))
            .unwrap()
            .when("post_type", "=", "page")
            .unwrap();
        repository
            .register(container("crb_admins", ContainerKind::ThemeOptions))
            .unwrap()
            .when("current_user_role", "IN", vec!["administrator"])
            .unwrap();
        repository.register(container("crb_always", ContainerKind::UserMeta)).unwrap();

        let ctx = RequestContext::new()
            .with("post_type", "page")
            .with("current_user_role", vec!["editor"]);
        let active: Vec<&str> = repository.active(&ctx).into_iter().map(Container::id).collect();
        assert_eq!(active, vec!["crb_pages", "crb_always"]);

        repository
            .get_mut("crb_pages")
            .unwrap()
            .when("post_id", "=", 7)
            .unwrap();
        let active: Vec<&str> = repository.active(&ctx).into_iter().map(Container::id).collect();
        assert_eq!(active, vec!["crb_always"]);
    }
}
