// SPDX-License-Identifier: MIT

//! Data model for workflow definitions and their running instances
//!
//! Field names are camelCase on the wire (`isInitial`, `fromStates`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_enabled() -> bool {
    true
}

/// A node in a workflow graph
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub id: String,
    #[serde(default)]
    pub is_initial: bool,
    #[serde(default)]
    pub is_final: bool,
    /// Carried on the model but not consulted by the transition rule
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl State {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_initial: false,
            is_final: false,
            enabled: true,
        }
    }

    pub fn initial(mut self) -> Self {
        self.is_initial = true;
        self
    }

    pub fn terminal(mut self) -> Self {
        self.is_final = true;
        self
    }
}

/// A named transition with one or more source states and one destination
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    pub from_states: Vec<String>,
    pub to_state: String,
    /// Carried on the model but not consulted by the transition rule
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Action {
    pub fn new<I, S>(id: impl Into<String>, from_states: I, to_state: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            from_states: from_states.into_iter().map(Into::into).collect(),
            to_state: to_state.into(),
            enabled: true,
        }
    }

    /// Whether this action may fire while an instance sits in `state_id`
    pub fn permits_from(&self, state_id: &str) -> bool {
        self.from_states.iter().any(|s| s == state_id)
    }
}

/// Immutable blueprint of a workflow
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct WorkflowDefinition {
    pub id: String,
    pub states: Vec<State>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl WorkflowDefinition {
    pub fn new(id: impl Into<String>, states: Vec<State>, actions: Vec<Action>) -> Self {
        Self {
            id: id.into(),
            states,
            actions,
        }
    }

    /// First state flagged initial, if any
    pub fn initial_state(&self) -> Option<&State> {
        self.states.iter().find(|s| s.is_initial)
    }

    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }
}

/// One recorded, successfully applied action
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub action_id: String,
    pub timestamp: DateTime<Utc>,
}

/// A live execution of a workflow definition
///
/// Holds the definition's id rather than a copy; the definition is resolved
/// through the registry whenever an action is executed.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstance {
    pub id: Uuid,
    pub definition_id: String,
    pub current_state_id: String,
    pub history: Vec<HistoryEntry>,
}

impl WorkflowInstance {
    /// Start a fresh instance in `initial_state_id` with an empty history
    pub fn start(definition_id: impl Into<String>, initial_state_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            definition_id: definition_id.into(),
            current_state_id: initial_state_id.into(),
            history: Vec::new(),
        }
    }
}
