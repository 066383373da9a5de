// SPDX-License-Identifier: MIT

//! In-memory store of running workflow instances
//!
//! The map lock is only held to find or insert an entry. Each instance sits
//! behind its own mutex so actions on one instance are serialized without
//! blocking the others.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::types::WorkflowInstance;

pub type InstanceHandle = Arc<Mutex<WorkflowInstance>>;

#[derive(Clone)]
pub struct InstanceStore {
    instances: Arc<RwLock<HashMap<Uuid, InstanceHandle>>>,
}

impl InstanceStore {
    pub fn new() -> Self {
        Self {
            instances: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert(&self, instance: WorkflowInstance) -> InstanceHandle {
        let id = instance.id;
        let handle = Arc::new(Mutex::new(instance));
        self.instances.write().await.insert(id, Arc::clone(&handle));
        handle
    }

    /// Look up an instance by its textual id; ids that are not UUIDs are never found
    pub async fn handle(&self, id: &str) -> Option<InstanceHandle> {
        let id = Uuid::parse_str(id).ok()?;
        self.instances.read().await.get(&id).cloned()
    }

    /// Snapshot of one instance
    pub async fn get(&self, id: &str) -> Option<WorkflowInstance> {
        let handle = self.handle(id).await?;
        let instance = handle.lock().await;
        Some(instance.clone())
    }

    /// Snapshots of every instance of one definition, ordered by instance id
    pub async fn list_for_definition(&self, definition_id: &str) -> Vec<WorkflowInstance> {
        let handles: Vec<InstanceHandle> =
            self.instances.read().await.values().cloned().collect();

        let mut matching = Vec::new();
        for handle in handles {
            let instance = handle.lock().await;
            if instance.definition_id == definition_id {
                matching.push(instance.clone());
            }
        }
        matching.sort_by_key(|i| i.id);
        matching
    }

    pub async fn count(&self) -> usize {
        self.instances.read().await.len()
    }
}

impl Default for InstanceStore {
    fn default() -> Self {
        Self::new()
    }
}
