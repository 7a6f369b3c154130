use crate::app_handler::AppHandler;
use crate::branch_handler::BranchHandler;
use crate::domain_handler::DomainHandler;
use crate::service::emulator::{AmplifyEmulator, EmulatorClient, EmulatorConfig};
use crate::service::AmplifyApi;
use crate::settings::HandlerSettings;
use handler_framework::{HandlerRuntime, Reconciler, RuntimeConfig};
use tokio::task::JoinHandle;
use tracing::{error, info};

const EMULATOR_BUFFER: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("Amplify emulator task failed: {0}")]
    EmulatorTask(#[from] tokio::task::JoinError),
}

/// The three Amplify handlers wired to a running emulator.
///
/// `AmplifySystem` is responsible for:
/// - **Lifecycle Management**: starting the emulator task and stopping it again
/// - **Wiring**: one reconciler per resource type, built from [`HandlerSettings`]
/// - **Driving**: a [`HandlerRuntime`] that re-invokes operations until they finish
///
/// # Example
///
/// ```ignore
/// let system = AmplifySystem::new(
///     HandlerSettings::default(),
///     EmulatorConfig::default(),
///     RuntimeConfig::default(),
/// );
///
/// let outcome = system
///     .runtime
///     .drive(&system.apps, system.api(), OperationKind::Create, request)
///     .await;
///
/// system.shutdown().await?;
/// ```
pub struct AmplifySystem {
    pub client: EmulatorClient,
    pub apps: Reconciler<AppHandler>,
    pub branches: Reconciler<BranchHandler>,
    pub domains: Reconciler<DomainHandler>,
    pub runtime: HandlerRuntime,
    handle: JoinHandle<()>,
}

impl AmplifySystem {
    /// Spawn the emulator and build the reconcilers. Must be called inside a Tokio runtime.
    pub fn new(settings: HandlerSettings, emulator: EmulatorConfig, runtime: RuntimeConfig) -> Self {
        let (emulator, client) = AmplifyEmulator::new(EMULATOR_BUFFER, emulator);
        let handle = tokio::spawn(emulator.run());
        info!(?settings, "Amplify handlers ready");

        Self {
            client,
            apps: Reconciler::new(AppHandler::new(settings.app)),
            branches: Reconciler::new(BranchHandler::new(settings.branch)),
            domains: Reconciler::new(DomainHandler::new(settings.domain)),
            runtime: HandlerRuntime::new(runtime),
            handle,
        }
    }

    /// The emulator client as the handlers see it.
    pub fn api(&self) -> &(dyn AmplifyApi + 'static) {
        &self.client
    }

    /// Drop the client so the emulator's channel closes, then wait for its task.
    ///
    /// Clones of the client handed out elsewhere keep the emulator alive, so drop them
    /// first.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down Amplify system");
        drop(self.client);

        if let Err(e) = self.handle.await {
            error!(error = %e, "Amplify emulator task failed");
            return Err(e.into());
        }

        info!("Amplify system shutdown complete");
        Ok(())
    }
}
