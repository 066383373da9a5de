// SPDX-License-Identifier: MIT

//! Mapping of engine errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{DefinitionError, LookupError, TransitionError};

/// Errors returned by route handlers
///
/// The same engine condition can map to different statuses depending on the
/// route: an unknown instance is a 404 on lookup but a 400 when an action is
/// posted against it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Definition(_) => StatusCode::BAD_REQUEST,
            ApiError::Lookup(LookupError::NoInitialState(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Lookup(_) => StatusCode::NOT_FOUND,
            ApiError::Transition(err) => match err {
                TransitionError::InstanceNotFound(_) | TransitionError::ActionNotFound(_) => {
                    StatusCode::BAD_REQUEST
                }
                TransitionError::InvalidTerminalTransition { .. }
                | TransitionError::IllegalTransition { .. } => StatusCode::CONFLICT,
                TransitionError::InternalConsistencyFault { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Definition(err) => match err {
                DefinitionError::DuplicateDefinitionId(_) => "DUPLICATE_DEFINITION_ID",
                DefinitionError::InvalidInitialStateCount { .. } => "INVALID_INITIAL_STATE_COUNT",
                DefinitionError::DuplicateStateId(_) => "DUPLICATE_STATE_ID",
                DefinitionError::DuplicateActionId(_) => "DUPLICATE_ACTION_ID",
                DefinitionError::EmptyFromStates(_) => "EMPTY_FROM_STATES",
                DefinitionError::UnknownStateReference { .. } => "UNKNOWN_STATE_REFERENCE",
            },
            ApiError::Lookup(err) => match err {
                LookupError::DefinitionNotFound(_) => "DEFINITION_NOT_FOUND",
                LookupError::InstanceNotFound(_) => "INSTANCE_NOT_FOUND",
                LookupError::NoInitialState(_) => "INTERNAL_CONSISTENCY_FAULT",
            },
            ApiError::Transition(err) => match err {
                TransitionError::InstanceNotFound(_) => "INSTANCE_NOT_FOUND",
                TransitionError::InvalidTerminalTransition { .. } => "INVALID_TERMINAL_TRANSITION",
                TransitionError::ActionNotFound(_) => "ACTION_NOT_FOUND",
                TransitionError::IllegalTransition { .. } => "ILLEGAL_TRANSITION",
                TransitionError::InternalConsistencyFault { .. } => "INTERNAL_CONSISTENCY_FAULT",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Server faults are bugs; keep their details in the log only
        let error = if status.is_server_error() {
            log::error!("Internal error: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for route handlers
pub type ApiResult<T> = Result<T, ApiError>;
