//! # Stabilization Poller
//!
//! After a mutating call some resources need time before they are usable (or gone).
//! The poller runs the resource's `is_stabilized` predicate **once per invocation** and
//! turns the answer into a decision:
//!
//! | predicate          | decision                                                |
//! |--------------------|---------------------------------------------------------|
//! | `Ok(true)`         | [`PollOutcome::Stabilized`]                             |
//! | `Ok(false)`        | [`PollOutcome::Pending`] with the next delay            |
//! | `Ok(false)`, late  | [`HandlerError::StabilizationTimedOut`]                 |
//! | `Err(e)`           | `e`, terminal                                           |
//!
//! The poller never sleeps. A pending decision is returned to the invoking framework as
//! `IN_PROGRESS`, and the attempt counter lives in the
//! [`CallbackContext`](crate::CallbackContext).

use crate::backoff::Constant;
use crate::context::CallbackContext;
use crate::error::HandlerError;
use crate::executor::Executor;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Decision for one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Stabilized,
    Pending { delay: Duration },
}

pub struct Poller {
    strategy: Constant,
}

impl Poller {
    pub fn new(strategy: Constant) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> Constant {
        self.strategy
    }

    /// Await `predicate` once and decide whether to continue, wait or give up.
    pub async fn poll<I, F>(
        &self,
        executor: &Executor,
        context: &mut CallbackContext<I>,
        predicate: F,
    ) -> Result<PollOutcome, HandlerError>
    where
        F: Future<Output = Result<bool, HandlerError>>,
    {
        let attempt = context.stabilization_attempts + 1;
        if predicate.await? {
            info!(
                type_name = executor.type_name(),
                identifier = executor.identifier(),
                attempt,
                "Stabilized"
            );
            return Ok(PollOutcome::Stabilized);
        }

        context.stabilization_attempts = attempt;
        match self.strategy.next_delay(attempt) {
            Some(delay) => {
                debug!(
                    type_name = executor.type_name(),
                    identifier = executor.identifier(),
                    attempt,
                    delay_secs = delay.as_secs(),
                    "Not stabilized yet"
                );
                Ok(PollOutcome::Pending { delay })
            }
            None => {
                warn!(
                    type_name = executor.type_name(),
                    identifier = executor.identifier(),
                    attempt,
                    "Stabilization timed out"
                );
                Err(HandlerError::StabilizationTimedOut {
                    type_name: executor.type_name(),
                    identifier: executor.identifier().to_string(),
                    timeout: self.strategy.timeout,
                })
            }
        }
    }
}

/// Interpret the result of a "get" issued while waiting for a delete to finish.
///
/// This is the one place where `NotFound` is good news: the resource being absent *is*
/// the stable state a delete waits for. A resource that is still present means keep
/// polling, and any other fault aborts the delete as `NotStabilized`.
pub fn absence_as_stabilized<T>(
    executor: &Executor,
    lookup: Result<T, HandlerError>,
) -> Result<bool, HandlerError> {
    match lookup {
        Ok(_) => {
            debug!(
                type_name = executor.type_name(),
                identifier = executor.identifier(),
                "Delete stabilization still in progress"
            );
            Ok(false)
        }
        Err(HandlerError::NotFound { .. }) => {
            debug!(
                type_name = executor.type_name(),
                identifier = executor.identifier(),
                "Delete stabilization complete"
            );
            Ok(true)
        }
        Err(e) => Err(HandlerError::not_stabilized(
            executor.type_name(),
            executor.identifier(),
            Some(e.to_string()),
        )),
    }
}
