// SPDX-License-Identifier: MIT

//! transit-rs: finite-state-machine workflows over HTTP
//!
//! A workflow definition names states and the actions that move between
//! them. Instances of a definition are driven forward one action at a time
//! and the engine refuses any transition the definition does not allow.

pub mod config;
pub mod error;
pub mod server;
pub mod workflow;

pub use error::{DefinitionError, LookupError, Result, TransitError, TransitionError};
