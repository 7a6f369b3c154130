//! # Amplify Handlers Demo
//!
//! Drives an app, a branch and a custom domain through their whole lifecycle against
//! the in-process emulator:
//! 1.  Create the app, then a `main` branch on it.
//! 2.  Associate `example.com` with the branch and wait for the domain to settle.
//! 3.  Read, list and update.
//! 4.  Delete everything in reverse order.
//!
//! Polling delays are skipped so the demo finishes immediately. Set
//! `AMPLIFY_HANDLER_SETTINGS` to a JSON file to override the handler timings and
//! `RUST_LOG=debug` to watch every service call.

use amplify_handlers::lifecycle::AmplifySystem;
use amplify_handlers::model::{AppModel, BranchModel, DomainModel, Tag};
use amplify_handlers::service::emulator::EmulatorConfig;
use amplify_handlers::HandlerSettings;
use handler_framework::tracing::setup_tracing;
use handler_framework::{
    OperationKind, OperationStatus, ResourceHandlerRequest, RunOutcome, RuntimeConfig,
};
use std::time::Duration;
use tracing::{info, Instrument};

const SETTINGS_ENV: &str = "AMPLIFY_HANDLER_SETTINGS";

/// The resource model of a successful outcome, or the failure message.
fn succeeded<M: Clone, C>(outcome: RunOutcome<M, C>, what: &str) -> Result<Option<M>, String> {
    let event = outcome.event;
    if event.status() != OperationStatus::Success {
        return Err(format!(
            "{what} failed ({:?}): {}",
            event.error_code(),
            event.message().unwrap_or("no message")
        ));
    }
    info!(what, invocations = outcome.invocations, "Operation succeeded");
    Ok(event.resource_model().cloned())
}

fn required<M>(model: Option<M>, what: &str) -> Result<M, String> {
    model.ok_or_else(|| format!("{what} returned no resource model"))
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let settings = match std::env::var(SETTINGS_ENV) {
        Ok(path) => HandlerSettings::from_json_file(&path).map_err(|e| e.to_string())?,
        Err(_) => HandlerSettings::default(),
    };

    let system = AmplifySystem::new(
        settings,
        EmulatorConfig::default(),
        RuntimeConfig {
            delay_override: Some(Duration::ZERO),
            ..RuntimeConfig::default()
        },
    );
    let api = system.api();

    let span = tracing::info_span!("app");
    let app = async {
        let desired = AppModel {
            repository: Some("https://github.com/example/site".into()),
            tags: Some(vec![Tag::new("team", "web")]),
            ..AppModel::named("demo-site")
        };
        let outcome = system
            .runtime
            .drive(
                &system.apps,
                api,
                OperationKind::Create,
                ResourceHandlerRequest::new(desired).with_logical_id("DemoApp"),
            )
            .await;
        required(succeeded(outcome, "create app")?, "create app")
    }
    .instrument(span)
    .await?;
    let app_id = required(app.app_id.clone(), "create app")?;
    info!(%app_id, default_domain = ?app.default_domain, "App ready");

    let span = tracing::info_span!("branch", %app_id);
    let branch = async {
        let desired = BranchModel {
            stage: Some("PRODUCTION".into()),
            ..BranchModel::new(app_id.as_str(), "main")
        };
        let outcome = system
            .runtime
            .drive(
                &system.branches,
                api,
                OperationKind::Create,
                ResourceHandlerRequest::new(desired).with_logical_id("DemoBranch"),
            )
            .await;
        required(succeeded(outcome, "create branch")?, "create branch")
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("domain", %app_id);
    let domain = async {
        let desired = DomainModel::new(app_id.as_str(), "example.com").with_sub_domain("www", "main");
        let outcome = system
            .runtime
            .drive(
                &system.domains,
                api,
                OperationKind::Create,
                ResourceHandlerRequest::new(desired).with_logical_id("DemoDomain"),
            )
            .await;
        required(succeeded(outcome, "create domain")?, "create domain")
    }
    .instrument(span)
    .await?;
    info!(
        status = ?domain.domain_status,
        certificate_record = ?domain.certificate_record,
        "Domain ready"
    );

    let read = system
        .runtime
        .drive(&system.apps, api, OperationKind::Read, ResourceHandlerRequest::new(app.clone()))
        .await;
    succeeded(read, "read app")?;

    let listed = system
        .runtime
        .drive(
            &system.branches,
            api,
            OperationKind::List,
            ResourceHandlerRequest::new(BranchModel {
                app_id: Some(app_id.clone()),
                ..BranchModel::default()
            }),
        )
        .await;
    let count = listed.event.resource_models().map_or(0, <[BranchModel]>::len);
    info!(count, "Branches listed");

    let updated = AppModel {
        description: Some("Marketing site".into()),
        tags: Some(vec![Tag::new("team", "marketing")]),
        ..app.clone()
    };
    let outcome = system
        .runtime
        .drive(
            &system.apps,
            api,
            OperationKind::Update,
            ResourceHandlerRequest::new(updated).with_previous(app.clone()),
        )
        .await;
    succeeded(outcome, "update app")?;

    let outcome = system
        .runtime
        .drive(&system.domains, api, OperationKind::Delete, ResourceHandlerRequest::new(domain))
        .await;
    succeeded(outcome, "delete domain")?;
    let outcome = system
        .runtime
        .drive(&system.branches, api, OperationKind::Delete, ResourceHandlerRequest::new(branch))
        .await;
    succeeded(outcome, "delete branch")?;
    let outcome = system
        .runtime
        .drive(&system.apps, api, OperationKind::Delete, ResourceHandlerRequest::new(app))
        .await;
    succeeded(outcome, "delete app")?;

    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Demo completed successfully");
    Ok(())
}
