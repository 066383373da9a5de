//! The transition rule applied when an action is executed

use chrono::{DateTime, Utc};

use crate::error::TransitionError;

use super::types::{HistoryEntry, WorkflowDefinition, WorkflowInstance};

/// Apply `action_id` to `instance` under `definition`, recording it at `at`.
///
/// All checks run before anything is written, so on error the instance is
/// left exactly as it was. The `enabled` flags on states and actions are not
/// consulted, and `to_state` is not checked against the declared states.
pub fn apply_action(
    definition: &WorkflowDefinition,
    instance: &mut WorkflowInstance,
    action_id: &str,
    at: DateTime<Utc>,
) -> Result<(), TransitionError> {
    let current = match definition.state(&instance.current_state_id) {
        Some(state) if !state.is_final => state,
        _ => {
            return Err(TransitionError::InvalidTerminalTransition {
                state: instance.current_state_id.clone(),
            })
        }
    };

    let action = definition
        .action(action_id)
        .ok_or_else(|| TransitionError::ActionNotFound(action_id.to_string()))?;

    if !action.permits_from(&current.id) {
        return Err(TransitionError::IllegalTransition {
            action: action.id.clone(),
            state: current.id.clone(),
        });
    }

    instance.current_state_id = action.to_state.clone();
    instance.history.push(HistoryEntry {
        action_id: action.id.clone(),
        timestamp: at,
    });
    Ok(())
}
