// SPDX-License-Identifier: MIT

use crate::error::DefinitionError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::types::WorkflowDefinition;
use super::validator::DefinitionValidator;

/// Write-once store of workflow definitions keyed by id
///
/// Entries are never replaced or removed. Definitions are handed out as
/// `Arc`s so instances can resolve them without copying.
#[derive(Clone)]
pub struct DefinitionRegistry {
    definitions: Arc<RwLock<HashMap<String, Arc<WorkflowDefinition>>>>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self {
            definitions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Validate and insert `definition` under a single write guard
    pub async fn register(
        &self,
        definition: WorkflowDefinition,
        validator: &DefinitionValidator,
    ) -> Result<Arc<WorkflowDefinition>, DefinitionError> {
        let mut definitions = self.definitions.write().await;
        validator.validate(&definition, |id| definitions.contains_key(id))?;

        let definition = Arc::new(definition);
        definitions.insert(definition.id.clone(), Arc::clone(&definition));
        Ok(definition)
    }

    pub async fn get(&self, id: &str) -> Option<Arc<WorkflowDefinition>> {
        let definitions = self.definitions.read().await;
        definitions.get(id).cloned()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.definitions.read().await.contains_key(id)
    }

    /// All definitions, ordered by id
    pub async fn list(&self) -> Vec<Arc<WorkflowDefinition>> {
        let definitions = self.definitions.read().await;
        let mut all: Vec<_> = definitions.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}

impl Default for DefinitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::types::{Action, State};
    use crate::workflow::validator::ValidationMode;

    fn definition(id: &str) -> WorkflowDefinition {
        WorkflowDefinition::new(
            id,
            vec![State::new("open").initial(), State::new("closed").terminal()],
            vec![Action::new("close", ["open"], "closed")],
        )
    }

    #[tokio::test]
    async fn test_register_and_get_definition() {
        let registry = DefinitionRegistry::new();
        let validator = DefinitionValidator::default();

        let stored = registry
            .register(definition("ticket"), &validator)
            .await
            .unwrap();
        assert_eq!(stored.id, "ticket");

        let retrieved = registry.get("ticket").await;
        assert!(retrieved.is_some());
        assert!(Arc::ptr_eq(&retrieved.unwrap(), &stored));
    }

    #[tokio::test]
    async fn test_get_nonexistent_definition() {
        let registry = DefinitionRegistry::new();

        assert!(registry.get("nonexistent").await.is_none());
        assert!(!registry.contains("nonexistent").await);
    }

    #[tokio::test]
    async fn test_register_does_not_overwrite_existing() {
        let registry = DefinitionRegistry::new();
        let validator = DefinitionValidator::default();
        registry
            .register(definition("ticket"), &validator)
            .await
            .unwrap();

        let mut replacement = definition("ticket");
        replacement.states.push(State::new("reopened"));
        let err = registry
            .register(replacement, &validator)
            .await
            .unwrap_err();
        assert_eq!(err, DefinitionError::DuplicateDefinitionId("ticket".into()));

        // First registration is untouched
        let kept = registry.get("ticket").await.unwrap();
        assert_eq!(*kept, definition("ticket"));
    }

    #[tokio::test]
    async fn test_rejected_definition_is_not_stored() {
        let registry = DefinitionRegistry::new();
        let validator = DefinitionValidator::new(ValidationMode::Permissive);

        let mut invalid = definition("ticket");
        invalid.states[0].is_initial = false;
        assert!(registry.register(invalid, &validator).await.is_err());
        assert!(!registry.contains("ticket").await);
        assert!(registry.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_id() {
        let registry = DefinitionRegistry::new();
        let validator = DefinitionValidator::default();
        for id in ["zeta", "alpha", "mid"] {
            registry.register(definition(id), &validator).await.unwrap();
        }

        let ids: Vec<_> = registry
            .list()
            .await
            .iter()
            .map(|d| d.id.clone())
            .collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn test_registry_is_clone() {
        let registry = DefinitionRegistry::new();
        let validator = DefinitionValidator::default();
        registry
            .register(definition("one"), &validator)
            .await
            .unwrap();

        let cloned = registry.clone();
        assert!(cloned.get("one").await.is_some());

        // Registering on clone should be visible to original
        cloned
            .register(definition("two"), &validator)
            .await
            .unwrap();
        assert!(registry.get("two").await.is_some());
    }
}
