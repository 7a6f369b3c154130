//! # Scripted Service Mocks
//!
//! `ScriptedService` is the building block for mock service clients. A test queues up
//! the calls it expects, in order, together with the response each one should get.
//! The mock client answers each incoming call with the next queued response.
//!
//! ## Strict Ordering
//!
//! Expectations form a FIFO queue. A call that does not match the head of the queue (or
//! arrives when the queue is empty) panics immediately, naming both sides. This catches
//! "the create call was issued again" or "one poll too many" exactly where it happens.
//!
//! ## When to use Mocks vs the Emulator
//!
//! | Feature | ScriptedService | Emulator |
//! |---------|-----------------|----------|
//! | **Speed** | Instant | Fast (but involves tokio spawn) |
//! | **Determinism** | 100% Deterministic | Subject to scheduler |
//! | **State** | None (expectations) | Real in-memory state |
//! | **Use Case** | Pipeline step order, poll counts | End-to-end lifecycles |
//! | **Error Injection** | Easy (`return_err`) | Limited to configured failures |
//!
//! ## Example
//!
//! ```rust
//! use handler_framework::mock::ScriptedService;
//! use handler_framework::ServiceError;
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Op { Get }
//!
//! let script = ScriptedService::<Op, u32>::new();
//! script.expect(Op::Get).return_ok(1);
//! script.expect(Op::Get).return_err(ServiceError::not_found("gone"));
//!
//! assert_eq!(script.next(Op::Get), Ok(1));
//! assert!(script.next(Op::Get).is_err());
//! assert_eq!(script.call_count(Op::Get), 2);
//! script.verify();
//! ```

use crate::error::ServiceError;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct Expectation<Op, R> {
    operation: Op,
    response: Result<R, ServiceError>,
}

/// A FIFO script of expected calls and their responses.
///
/// Cloning shares the script, so a test can keep one handle for `verify()` while the
/// mock client owns another.
pub struct ScriptedService<Op, R> {
    expectations: Arc<Mutex<VecDeque<Expectation<Op, R>>>>,
    calls: Arc<Mutex<Vec<Op>>>,
}

impl<Op, R> Clone for ScriptedService<Op, R> {
    fn clone(&self) -> Self {
        Self {
            expectations: self.expectations.clone(),
            calls: self.calls.clone(),
        }
    }
}

impl<Op, R> Default for ScriptedService<Op, R> {
    fn default() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<Op: Copy + PartialEq + Debug, R> ScriptedService<Op, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an expected call.
    pub fn expect(&self, operation: Op) -> ExpectationBuilder<Op, R> {
        ExpectationBuilder {
            operation,
            expectations: self.expectations.clone(),
        }
    }

    /// Answer `operation` with the next queued response.
    ///
    /// # Panics
    /// When nothing is queued or the head of the queue expects a different call.
    pub fn next(&self, operation: Op) -> Result<R, ServiceError> {
        locked(&self.calls).push(operation);
        let expectation = locked(&self.expectations).pop_front();
        match expectation {
            Some(expectation) if expectation.operation == operation => expectation.response,
            Some(expectation) => panic!(
                "Unexpected call {:?}; next expectation is {:?}",
                operation, expectation.operation
            ),
            None => panic!("Unexpected call {:?}; no expectations left", operation),
        }
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<Op> {
        locked(&self.calls).clone()
    }

    pub fn call_count(&self, operation: Op) -> usize {
        locked(&self.calls)
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining: Vec<Op> = locked(&self.expectations)
            .iter()
            .map(|e| e.operation)
            .collect();
        if !remaining.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining: {:?}",
                remaining.len(),
                remaining
            );
        }
    }
}

/// Builder for one expectation.
pub struct ExpectationBuilder<Op, R> {
    operation: Op,
    expectations: Arc<Mutex<VecDeque<Expectation<Op, R>>>>,
}

impl<Op, R> ExpectationBuilder<Op, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        locked(&self.expectations).push_back(Expectation {
            operation: self.operation,
            response: Ok(value),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ServiceError) {
        locked(&self.expectations).push_back(Expectation {
            operation: self.operation,
            response: Err(error),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Op {
        Create,
        Get,
    }

    #[test]
    fn test_responses_come_back_in_order() {
        let script = ScriptedService::<Op, &str>::new();
        script.expect(Op::Create).return_ok("created");
        script.expect(Op::Get).return_ok("fetched");

        assert_eq!(script.next(Op::Create), Ok("created"));
        assert_eq!(script.next(Op::Get), Ok("fetched"));
        assert_eq!(script.calls(), vec![Op::Create, Op::Get]);
        script.verify();
    }

    #[test]
    #[should_panic(expected = "Unexpected call Get")]
    fn test_out_of_order_call_panics() {
        let script = ScriptedService::<Op, ()>::new();
        script.expect(Op::Create).return_ok(());
        let _ = script.next(Op::Get);
    }

    #[test]
    #[should_panic(expected = "Not all expectations were met")]
    fn test_verify_reports_leftovers() {
        let script = ScriptedService::<Op, ()>::new();
        script.expect(Op::Get).return_ok(());
        script.verify();
    }
}
