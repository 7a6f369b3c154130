//! # Callback Context
//!
//! The only state that survives between invocations of one logical operation. Each
//! invocation may run in a fresh process, so everything the pipelines need to resume
//! is in here and it round-trips through JSON.

use serde::{Deserialize, Serialize};

/// Continuation state for one in-flight operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackContext<I> {
    /// Identity assigned by the remote service once the create call succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<I>,

    /// Whether the operation's mutating call (create/update/delete) was issued.
    #[serde(default)]
    pub mutation_issued: bool,

    /// Stabilization polls so far that did not report a stable state.
    #[serde(default)]
    pub stabilization_attempts: u32,
}

impl<I> Default for CallbackContext<I> {
    fn default() -> Self {
        Self {
            identity: None,
            mutation_issued: false,
            stabilization_attempts: 0,
        }
    }
}

impl<I> CallbackContext<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_mutation(&mut self) {
        self.mutation_issued = true;
    }

    pub fn record_identity(&mut self, identity: I) {
        self.identity = Some(identity);
        self.mutation_issued = true;
    }
}
