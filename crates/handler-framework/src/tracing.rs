use tracing_subscriber::EnvFilter;

/// Initializes structured logging for handler binaries and tests.
///
/// # Environment Variables
///
/// Set `RUST_LOG` to control log verbosity:
/// - `RUST_LOG=info` - Operation outcomes and stabilization results
/// - `RUST_LOG=debug` - Every service call and poll decision
/// - `RUST_LOG=handler_framework=debug` - Debug only for the engine
///
/// Calling it more than once is harmless; later calls leave the first subscriber in place.
///
/// # Example
///
/// ```ignore
/// setup_tracing();
/// tracing::info!("Handler started");
/// ```
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
