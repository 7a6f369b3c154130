use amplify_handlers::lifecycle::AmplifySystem;
use amplify_handlers::model::{AppModel, BranchModel, DomainModel, Tag};
use amplify_handlers::service::emulator::EmulatorConfig;
use amplify_handlers::HandlerSettings;
use handler_framework::{
    HandlerErrorCode, OperationKind, OperationStatus, ResourceHandlerRequest, RuntimeConfig,
};
use std::time::Duration;

fn start(emulator: EmulatorConfig) -> AmplifySystem {
    AmplifySystem::new(
        HandlerSettings::default(),
        emulator,
        RuntimeConfig {
            delay_override: Some(Duration::ZERO),
            ..RuntimeConfig::default()
        },
    )
}

async fn create_app(system: &AmplifySystem, name: &str) -> AppModel {
    let outcome = system
        .runtime
        .drive(
            &system.apps,
            system.api(),
            OperationKind::Create,
            ResourceHandlerRequest::new(AppModel {
                tags: Some(vec![Tag::new("team", "web")]),
                ..AppModel::named(name)
            }),
        )
        .await;
    assert_eq!(outcome.event.status(), OperationStatus::Success);
    outcome.event.resource_model().cloned().expect("app model")
}

async fn create_branch(system: &AmplifySystem, app_id: &str) -> BranchModel {
    let outcome = system
        .runtime
        .drive(
            &system.branches,
            system.api(),
            OperationKind::Create,
            ResourceHandlerRequest::new(BranchModel::new(app_id, "main")),
        )
        .await;
    assert_eq!(outcome.event.status(), OperationStatus::Success);
    outcome.event.resource_model().cloned().expect("branch model")
}

/// Full lifecycle of all three resource types against the emulator.
#[tokio::test]
async fn test_full_amplify_lifecycle() {
    let system = start(EmulatorConfig::default());

    let app = create_app(&system, "site").await;
    let app_id = app.app_id.clone().expect("app id");
    assert_eq!(
        app.default_domain.as_deref(),
        Some(format!("{app_id}.amplifyapp.com").as_str())
    );
    assert_eq!(app.tags, Some(vec![Tag::new("team", "web")]));

    let branch = create_branch(&system, &app_id).await;
    assert!(branch.arn.as_deref().unwrap().ends_with("/branches/main"));

    // Domain: existence check, create, two REQUESTING_CERTIFICATE polls, AVAILABLE.
    let outcome = system
        .runtime
        .drive(
            &system.domains,
            system.api(),
            OperationKind::Create,
            ResourceHandlerRequest::new(
                DomainModel::new(app_id.as_str(), "example.com").with_sub_domain("www", "main"),
            ),
        )
        .await;
    assert_eq!(outcome.event.status(), OperationStatus::Success);
    assert_eq!(outcome.invocations, 3);
    let domain = outcome.event.resource_model().cloned().expect("domain model");
    assert_eq!(domain.domain_status.as_deref(), Some("AVAILABLE"));
    assert!(domain.certificate_record.is_some());

    // Update the app's tags and read them back.
    let updated = AppModel {
        description: Some("Marketing site".into()),
        tags: Some(vec![Tag::new("team", "marketing")]),
        ..app.clone()
    };
    let outcome = system
        .runtime
        .drive(
            &system.apps,
            system.api(),
            OperationKind::Update,
            ResourceHandlerRequest::new(updated).with_previous(app.clone()),
        )
        .await;
    assert_eq!(outcome.event.status(), OperationStatus::Success);
    let read = outcome.event.resource_model().unwrap();
    assert_eq!(read.description.as_deref(), Some("Marketing site"));
    assert_eq!(read.tags, Some(vec![Tag::new("team", "marketing")]));

    // Update the domain: UPDATING is waited out.
    let outcome = system
        .runtime
        .drive(
            &system.domains,
            system.api(),
            OperationKind::Update,
            ResourceHandlerRequest::new(DomainModel {
                enable_auto_sub_domain: Some(true),
                ..domain.clone()
            }),
        )
        .await;
    assert_eq!(outcome.event.status(), OperationStatus::Success);
    assert!(outcome.invocations > 1);
    assert_eq!(
        outcome.event.resource_model().unwrap().enable_auto_sub_domain,
        Some(true)
    );

    let listed = system
        .runtime
        .drive(
            &system.domains,
            system.api(),
            OperationKind::List,
            ResourceHandlerRequest::new(DomainModel {
                app_id: Some(app_id.clone()),
                ..DomainModel::default()
            }),
        )
        .await;
    assert_eq!(listed.event.resource_models().map(<[DomainModel]>::len), Some(1));

    for (kind, outcome) in [
        (
            "domain",
            system
                .runtime
                .drive(
                    &system.domains,
                    system.api(),
                    OperationKind::Delete,
                    ResourceHandlerRequest::new(domain),
                )
                .await
                .event
                .status(),
        ),
        (
            "branch",
            system
                .runtime
                .drive(
                    &system.branches,
                    system.api(),
                    OperationKind::Delete,
                    ResourceHandlerRequest::new(branch),
                )
                .await
                .event
                .status(),
        ),
        (
            "app",
            system
                .runtime
                .drive(
                    &system.apps,
                    system.api(),
                    OperationKind::Delete,
                    ResourceHandlerRequest::new(app.clone()),
                )
                .await
                .event
                .status(),
        ),
    ] {
        assert_eq!(outcome, OperationStatus::Success, "delete {kind}");
    }

    let gone = system
        .runtime
        .drive(
            &system.apps,
            system.api(),
            OperationKind::Read,
            ResourceHandlerRequest::new(app),
        )
        .await;
    assert_eq!(gone.event.error_code(), Some(HandlerErrorCode::NotFound));

    system.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_empty_app_listing_succeeds() {
    let system = start(EmulatorConfig::default());

    let outcome = system
        .runtime
        .drive(
            &system.apps,
            system.api(),
            OperationKind::List,
            ResourceHandlerRequest::new(AppModel::default()),
        )
        .await;

    assert_eq!(outcome.event.status(), OperationStatus::Success);
    assert_eq!(outcome.event.resource_models().map(<[AppModel]>::len), Some(0));
    system.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_failing_domain_surfaces_not_stabilized() {
    let system = start(EmulatorConfig {
        fail_domains: vec!["broken.example".into()],
        ..EmulatorConfig::default()
    });
    let app = create_app(&system, "site").await;

    let outcome = system
        .runtime
        .drive(
            &system.domains,
            system.api(),
            OperationKind::Create,
            ResourceHandlerRequest::new(DomainModel::new(
                app.app_id.unwrap(),
                "broken.example",
            )),
        )
        .await;

    assert_eq!(outcome.invocations, 1);
    assert_eq!(outcome.event.error_code(), Some(HandlerErrorCode::NotStabilized));
    assert!(outcome
        .event
        .message()
        .unwrap()
        .contains("Unable to verify ownership of broken.example"));
    system.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_second_domain_create_is_already_exists() {
    let system = start(EmulatorConfig {
        domain_provisioning_polls: 0,
        ..EmulatorConfig::default()
    });
    let app = create_app(&system, "site").await;
    let app_id = app.app_id.unwrap();
    let request = ResourceHandlerRequest::new(DomainModel::new(app_id.as_str(), "example.com"));

    let first = system
        .runtime
        .drive(&system.domains, system.api(), OperationKind::Create, request.clone())
        .await;
    let second = system
        .runtime
        .drive(&system.domains, system.api(), OperationKind::Create, request)
        .await;

    assert_eq!(first.invocations, 1);
    assert_eq!(first.event.status(), OperationStatus::Success);
    assert_eq!(second.event.error_code(), Some(HandlerErrorCode::AlreadyExists));
    system.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_branch_on_missing_app_is_not_found() {
    let system = start(EmulatorConfig::default());

    let outcome = system
        .runtime
        .drive(
            &system.branches,
            system.api(),
            OperationKind::Create,
            ResourceHandlerRequest::new(BranchModel::new("dmissing", "main")),
        )
        .await;

    assert_eq!(outcome.event.error_code(), Some(HandlerErrorCode::NotFound));
    system.shutdown().await.expect("clean shutdown");
}
