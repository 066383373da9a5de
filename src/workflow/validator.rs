// SPDX-License-Identifier: MIT

//! Structural validation of workflow definitions
//!
//! Checks run in a fixed order and stop at the first failure:
//! 1. the identifier is not already registered
//! 2. exactly one state is initial
//! 3. (strict mode only) state and action ids are unique, every action has at
//!    least one source state, and every referenced state is declared

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::DefinitionError;

use super::types::WorkflowDefinition;

/// How thoroughly action references are checked at admission time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Reject dangling state references and duplicate ids
    #[default]
    Strict,
    /// Only check id uniqueness and the initial state count; dangling
    /// references surface when an instance traverses them
    Permissive,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Strict => write!(f, "strict"),
            ValidationMode::Permissive => write!(f, "permissive"),
        }
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(ValidationMode::Strict),
            "permissive" => Ok(ValidationMode::Permissive),
            other => Err(format!("Unknown validation mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefinitionValidator {
    mode: ValidationMode,
}

impl DefinitionValidator {
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Validate `candidate`; `is_taken` reports whether an id is already registered
    pub fn validate<F>(
        &self,
        candidate: &WorkflowDefinition,
        is_taken: F,
    ) -> Result<(), DefinitionError>
    where
        F: Fn(&str) -> bool,
    {
        if is_taken(&candidate.id) {
            return Err(DefinitionError::DuplicateDefinitionId(candidate.id.clone()));
        }

        let initial_count = candidate.states.iter().filter(|s| s.is_initial).count();
        if initial_count != 1 {
            return Err(DefinitionError::InvalidInitialStateCount {
                count: initial_count,
            });
        }

        if self.mode == ValidationMode::Strict {
            Self::check_references(candidate)?;
        }

        Ok(())
    }

    fn check_references(candidate: &WorkflowDefinition) -> Result<(), DefinitionError> {
        let mut state_ids = HashSet::with_capacity(candidate.states.len());
        for state in &candidate.states {
            if !state_ids.insert(state.id.as_str()) {
                return Err(DefinitionError::DuplicateStateId(state.id.clone()));
            }
        }

        let mut action_ids = HashSet::with_capacity(candidate.actions.len());
        for action in &candidate.actions {
            if !action_ids.insert(action.id.as_str()) {
                return Err(DefinitionError::DuplicateActionId(action.id.clone()));
            }
            if action.from_states.is_empty() {
                return Err(DefinitionError::EmptyFromStates(action.id.clone()));
            }

            let referenced = action
                .from_states
                .iter()
                .chain(std::iter::once(&action.to_state));
            for state in referenced {
                if !state_ids.contains(state.as_str()) {
                    return Err(DefinitionError::UnknownStateReference {
                        action: action.id.clone(),
                        state: state.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
