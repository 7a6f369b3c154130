//! # System Lifecycle
//!
//! Wires the handlers to a service and manages the service's runtime.
//!
//! In production the invoking framework owns the loop: it calls a
//! [`Reconciler`](handler_framework::Reconciler) once, persists the callback context of
//! an `IN_PROGRESS` event, waits the requested delay and calls again. Locally the same
//! loop is run by [`HandlerRuntime`](handler_framework::HandlerRuntime) against the
//! in-process [`AmplifyEmulator`](crate::service::emulator::AmplifyEmulator).
//!
//! ## Startup
//!
//! 1. **Emulator** - created with its client, then spawned on its own Tokio task.
//! 2. **Reconcilers** - one per resource type, each with its [`ResourceTimings`]
//!    taken from [`HandlerSettings`](crate::settings::HandlerSettings).
//! 3. **Runtime** - drives an operation to a terminal event.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop the client** - closes the sender side of the emulator's channel
//! 2. **Emulator detects closure** - `receiver.recv()` returns `None` and it logs its
//!    final state
//! 3. **Await the task** - a panic inside the emulator surfaces as [`SystemError`]
//!
//! [`ResourceTimings`]: handler_framework::ResourceTimings

pub mod amplify_system;

pub use amplify_system::{AmplifySystem, SystemError};
