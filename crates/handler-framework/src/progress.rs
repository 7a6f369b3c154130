//! # Progress Events
//!
//! Every invocation of a pipeline ends in exactly one [`ProgressEvent`]:
//!
//! - `IN_PROGRESS`: the operation suspended; re-invoke after `callbackDelaySeconds`
//!   with the returned context.
//! - `SUCCESS`: terminal, with the final model (or a page of models for list).
//! - `FAILED`: terminal, with an error code and a human-readable message.
//!
//! Being an enum, an event can never carry success and failure data at the same time.

use crate::error::{HandlerError, HandlerErrorCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle states of one logical operation.
///
/// `Pending` is the state before the first invocation; no transition leaves
/// `Success` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Pending,
    InProgress,
    Success,
    Failed,
}

impl OperationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OperationStatus::Success | OperationStatus::Failed)
    }
}

/// Result of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressEvent<M, C> {
    #[serde(rename_all = "camelCase")]
    InProgress {
        resource_model: M,
        callback_context: C,
        callback_delay_seconds: u64,
    },
    #[serde(rename_all = "camelCase")]
    Success {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resource_model: Option<M>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resource_models: Option<Vec<M>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        next_token: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Failed {
        error_code: HandlerErrorCode,
        message: String,
    },
}

impl<M, C> ProgressEvent<M, C> {
    pub fn in_progress(model: M, context: C, delay: Duration) -> Self {
        ProgressEvent::InProgress {
            resource_model: model,
            callback_context: context,
            callback_delay_seconds: delay.as_secs(),
        }
    }

    pub fn success(model: M) -> Self {
        ProgressEvent::Success {
            resource_model: Some(model),
            resource_models: None,
            next_token: None,
        }
    }

    pub fn success_list(models: Vec<M>, next_token: Option<String>) -> Self {
        ProgressEvent::Success {
            resource_model: None,
            resource_models: Some(models),
            next_token,
        }
    }

    /// Success without a body, as returned by delete.
    pub fn no_content() -> Self {
        ProgressEvent::Success {
            resource_model: None,
            resource_models: None,
            next_token: None,
        }
    }

    pub fn failed(error: &HandlerError) -> Self {
        ProgressEvent::Failed {
            error_code: error.code(),
            message: error.to_string(),
        }
    }

    pub fn status(&self) -> OperationStatus {
        match self {
            ProgressEvent::InProgress { .. } => OperationStatus::InProgress,
            ProgressEvent::Success { .. } => OperationStatus::Success,
            ProgressEvent::Failed { .. } => OperationStatus::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    pub fn resource_model(&self) -> Option<&M> {
        match self {
            ProgressEvent::InProgress { resource_model, .. } => Some(resource_model),
            ProgressEvent::Success { resource_model, .. } => resource_model.as_ref(),
            ProgressEvent::Failed { .. } => None,
        }
    }

    pub fn resource_models(&self) -> Option<&[M]> {
        match self {
            ProgressEvent::Success {
                resource_models: Some(models),
                ..
            } => Some(models.as_slice()),
            _ => None,
        }
    }

    pub fn callback_context(&self) -> Option<&C> {
        match self {
            ProgressEvent::InProgress {
                callback_context, ..
            } => Some(callback_context),
            _ => None,
        }
    }

    pub fn callback_delay_seconds(&self) -> u64 {
        match self {
            ProgressEvent::InProgress {
                callback_delay_seconds,
                ..
            } => *callback_delay_seconds,
            _ => 0,
        }
    }

    pub fn error_code(&self) -> Option<HandlerErrorCode> {
        match self {
            ProgressEvent::Failed { error_code, .. } => Some(*error_code),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ProgressEvent::Failed { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}

impl<M, C> From<HandlerError> for ProgressEvent<M, C> {
    fn from(error: HandlerError) -> Self {
        ProgressEvent::failed(&error)
    }
}
