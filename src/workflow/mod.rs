// SPDX-License-Identifier: MIT

//! Workflow definitions, running instances and the transition engine
//!
//! This module provides:
//! - `WorkflowDefinition` / `WorkflowInstance` - the data model
//! - `DefinitionValidator` - structural checks applied at admission
//! - `WorkflowEngine` - the entry point that ties the stores together

pub mod engine;
pub mod instances;
pub mod loader;
pub mod registry;
pub mod transition;
pub mod types;
pub mod validator;

pub use engine::WorkflowEngine;
pub use instances::InstanceStore;
pub use loader::WorkflowLoader;
pub use registry::DefinitionRegistry;
pub use types::{Action, HistoryEntry, State, WorkflowDefinition, WorkflowInstance};
pub use validator::{DefinitionValidator, ValidationMode};
