// SPDX-License-Identifier: MIT

//! Typed error handling for transit-rs
//!
//! Domain failures are split by the operation that produces them so that each
//! caller (engine, HTTP layer, CLI) can match on exactly the cases it can see.

use thiserror::Error;

/// Top-level error type for transit-rs
#[derive(Debug, Error)]
pub enum TransitError {
    /// Configuration errors (bad env vars, invalid flags)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A workflow definition was rejected
    #[error("Invalid definition: {0}")]
    Definition(#[from] DefinitionError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Reasons a candidate workflow definition is refused admission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// Definition identifiers are global and write-once
    #[error("Workflow definition '{0}' already exists")]
    DuplicateDefinitionId(String),

    /// Exactly one state must be marked initial
    #[error("Workflow must declare exactly one initial state, found {count}")]
    InvalidInitialStateCount { count: usize },

    #[error("State '{0}' is declared more than once")]
    DuplicateStateId(String),

    #[error("Action '{0}' is declared more than once")]
    DuplicateActionId(String),

    /// An action with no source states could never fire
    #[error("Action '{0}' declares no source states")]
    EmptyFromStates(String),

    /// An action references a state the definition does not declare
    #[error("Action '{action}' references unknown state '{state}'")]
    UnknownStateReference { action: String, state: String },
}

/// Failed read-side lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Workflow definition '{0}' not found")]
    DefinitionNotFound(String),

    #[error("Workflow instance '{0}' not found")]
    InstanceNotFound(String),

    /// A stored definition has no initial state; indicates a validator bug
    #[error("Workflow definition '{0}' has no initial state")]
    NoInitialState(String),
}

/// Reasons an action cannot be executed against an instance
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Workflow instance '{0}' not found")]
    InstanceNotFound(String),

    /// The instance sits in a final state, or in a state its definition does
    /// not declare
    #[error("Instance is in state '{state}', from which no action can be executed")]
    InvalidTerminalTransition { state: String },

    #[error("Action '{0}' not found in workflow definition")]
    ActionNotFound(String),

    #[error("Action '{action}' is not allowed from state '{state}'")]
    IllegalTransition { action: String, state: String },

    /// The instance references a definition that is not registered
    #[error("Instance '{instance}' references missing definition '{definition}'")]
    InternalConsistencyFault {
        instance: String,
        definition: String,
    },
}

impl TransitError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, TransitError>;
