// SPDX-License-Identifier: MIT

//! Workflow engine - admits definitions, starts instances and drives them
//!
//! `WorkflowEngine` is cheap to clone; clones share the same stores.

use chrono::Utc;
use std::sync::Arc;

use crate::error::{DefinitionError, LookupError, TransitionError};

use super::instances::InstanceStore;
use super::registry::DefinitionRegistry;
use super::transition::apply_action;
use super::types::{WorkflowDefinition, WorkflowInstance};
use super::validator::{DefinitionValidator, ValidationMode};

#[derive(Clone, Default)]
pub struct WorkflowEngine {
    definitions: DefinitionRegistry,
    instances: InstanceStore,
    validator: DefinitionValidator,
}

impl WorkflowEngine {
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            definitions: DefinitionRegistry::new(),
            instances: InstanceStore::new(),
            validator: DefinitionValidator::new(mode),
        }
    }

    pub fn validation_mode(&self) -> ValidationMode {
        self.validator.mode()
    }

    /// Validate and store a new definition
    pub async fn create_definition(
        &self,
        definition: WorkflowDefinition,
    ) -> Result<Arc<WorkflowDefinition>, DefinitionError> {
        let id = definition.id.clone();
        match self.definitions.register(definition, &self.validator).await {
            Ok(stored) => {
                log::info!(
                    "Registered workflow '{}' ({} states, {} actions)",
                    stored.id,
                    stored.states.len(),
                    stored.actions.len()
                );
                Ok(stored)
            }
            Err(e) => {
                log::warn!("Rejected workflow '{}': {}", id, e);
                Err(e)
            }
        }
    }

    pub async fn get_definition(&self, id: &str) -> Result<Arc<WorkflowDefinition>, LookupError> {
        self.definitions
            .get(id)
            .await
            .ok_or_else(|| LookupError::DefinitionNotFound(id.to_string()))
    }

    pub async fn list_definitions(&self) -> Vec<Arc<WorkflowDefinition>> {
        self.definitions.list().await
    }

    /// Start a new instance of `definition_id` in its initial state
    pub async fn create_instance(
        &self,
        definition_id: &str,
    ) -> Result<WorkflowInstance, LookupError> {
        let definition = self.get_definition(definition_id).await?;
        let initial = definition.initial_state().ok_or_else(|| {
            log::error!("Stored workflow '{}' has no initial state", definition.id);
            LookupError::NoInitialState(definition.id.clone())
        })?;

        let instance = WorkflowInstance::start(definition.id.clone(), initial.id.clone());
        self.instances.insert(instance.clone()).await;

        log::info!(
            "Created instance {} of '{}' in state '{}'",
            instance.id,
            instance.definition_id,
            instance.current_state_id
        );
        Ok(instance)
    }

    /// Execute `action_id` against an instance and return its updated snapshot
    ///
    /// The instance stays locked from definition lookup through the history
    /// append, so concurrent calls on the same instance apply one at a time.
    pub async fn execute_action(
        &self,
        instance_id: &str,
        action_id: &str,
    ) -> Result<WorkflowInstance, TransitionError> {
        let handle = self
            .instances
            .handle(instance_id)
            .await
            .ok_or_else(|| TransitionError::InstanceNotFound(instance_id.to_string()))?;
        let mut instance = handle.lock().await;

        let definition = match self.definitions.get(&instance.definition_id).await {
            Some(definition) => definition,
            None => {
                log::error!(
                    "Instance {} references unregistered workflow '{}'",
                    instance.id,
                    instance.definition_id
                );
                return Err(TransitionError::InternalConsistencyFault {
                    instance: instance.id.to_string(),
                    definition: instance.definition_id.clone(),
                });
            }
        };

        let from = instance.current_state_id.clone();
        if let Err(e) = apply_action(&definition, &mut instance, action_id, Utc::now()) {
            log::debug!("Instance {}: refused '{}': {}", instance.id, action_id, e);
            return Err(e);
        }

        log::info!(
            "Instance {}: '{}' moved {} -> {}",
            instance.id,
            action_id,
            from,
            instance.current_state_id
        );
        Ok(instance.clone())
    }

    pub async fn get_instance(&self, id: &str) -> Result<WorkflowInstance, LookupError> {
        self.instances
            .get(id)
            .await
            .ok_or_else(|| LookupError::InstanceNotFound(id.to_string()))
    }

    /// Number of live instances across all definitions
    pub async fn instance_count(&self) -> usize {
        self.instances.count().await
    }

    /// All instances of one definition
    pub async fn list_instances(
        &self,
        definition_id: &str,
    ) -> Result<Vec<WorkflowInstance>, LookupError> {
        if !self.definitions.contains(definition_id).await {
            return Err(LookupError::DefinitionNotFound(definition_id.to_string()));
        }
        Ok(self.instances.list_for_definition(definition_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::types::{Action, State};

    fn doc_approval() -> WorkflowDefinition {
        WorkflowDefinition::new(
            "doc-approval",
            vec![
                State::new("draft").initial(),
                State::new("in-review"),
                State::new("approved").terminal(),
                State::new("rejected").terminal(),
            ],
            vec![
                Action::new("submit-for-review", ["draft"], "in-review"),
                Action::new("approve", ["in-review"], "approved"),
                Action::new("reject", ["in-review"], "rejected"),
            ],
        )
    }

    async fn engine_with_doc_approval() -> WorkflowEngine {
        let engine = WorkflowEngine::default();
        engine.create_definition(doc_approval()).await.unwrap();
        engine
    }

    #[tokio::test]
    async fn test_instance_starts_in_initial_state() {
        let engine = engine_with_doc_approval().await;

        let instance = engine.create_instance("doc-approval").await.unwrap();
        assert_eq!(instance.definition_id, "doc-approval");
        assert_eq!(instance.current_state_id, "draft");
        assert!(instance.history.is_empty());

        let fetched = engine.get_instance(&instance.id.to_string()).await.unwrap();
        assert_eq!(fetched, instance);
    }

    #[tokio::test]
    async fn test_create_instance_unknown_definition() {
        let engine = WorkflowEngine::default();
        let err = engine.create_instance("missing").await.unwrap_err();
        assert_eq!(err, LookupError::DefinitionNotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn test_execute_unknown_instance() {
        let engine = engine_with_doc_approval().await;
        let err = engine
            .execute_action("0b9c4a3e-0000-4000-8000-000000000000", "approve")
            .await
            .unwrap_err();
        assert!(matches!(err, TransitionError::InstanceNotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_action_is_not_recorded() {
        let engine = engine_with_doc_approval().await;
        let instance = engine.create_instance("doc-approval").await.unwrap();
        let id = instance.id.to_string();

        let err = engine.execute_action(&id, "approve").await.unwrap_err();
        assert!(matches!(err, TransitionError::IllegalTransition { .. }));

        assert_eq!(engine.get_instance(&id).await.unwrap(), instance);
    }

    #[tokio::test]
    async fn test_instances_are_independent() {
        let engine = engine_with_doc_approval().await;
        let a = engine.create_instance("doc-approval").await.unwrap();
        let b = engine.create_instance("doc-approval").await.unwrap();

        engine
            .execute_action(&a.id.to_string(), "submit-for-review")
            .await
            .unwrap();

        let b = engine.get_instance(&b.id.to_string()).await.unwrap();
        assert_eq!(b.current_state_id, "draft");
        assert_eq!(engine.list_instances("doc-approval").await.unwrap().len(), 2);
        assert_eq!(engine.instance_count().await, 2);
    }

    #[tokio::test]
    async fn test_list_instances_unknown_definition() {
        let engine = WorkflowEngine::default();
        assert_eq!(
            engine.list_instances("missing").await.unwrap_err(),
            LookupError::DefinitionNotFound("missing".to_string())
        );
    }

    #[tokio::test]
    async fn test_orphaned_instance_is_consistency_fault() {
        let engine = WorkflowEngine::default();
        // Bypass the engine to plant an instance whose definition was never registered
        let orphan = WorkflowInstance::start("ghost", "start");
        let id = orphan.id.to_string();
        engine.instances.insert(orphan).await;

        let err = engine.execute_action(&id, "go").await.unwrap_err();
        assert_eq!(
            err,
            TransitionError::InternalConsistencyFault {
                instance: id.clone(),
                definition: "ghost".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_permissive_engine_strands_on_dangling_target() {
        let engine = WorkflowEngine::new(ValidationMode::Permissive);
        assert_eq!(engine.validation_mode(), ValidationMode::Permissive);

        let mut def = doc_approval();
        def.actions.push(Action::new("vanish", ["draft"], "nowhere"));
        engine.create_definition(def).await.unwrap();

        let id = engine
            .create_instance("doc-approval")
            .await
            .unwrap()
            .id
            .to_string();
        let moved = engine.execute_action(&id, "vanish").await.unwrap();
        assert_eq!(moved.current_state_id, "nowhere");

        let err = engine
            .execute_action(&id, "submit-for-review")
            .await
            .unwrap_err();
        assert!(matches!(err, TransitionError::InvalidTerminalTransition { .. }));
    }
}
