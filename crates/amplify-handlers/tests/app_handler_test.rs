use amplify_handlers::model::{AppModel, Tag};
use amplify_handlers::service::mock::MockAmplify;
use amplify_handlers::service::types::{App, Listing};
use amplify_handlers::service::{Operation, Reply};
use amplify_handlers::{AppHandler, HandlerSettings};
use handler_framework::{
    CallbackContext, HandlerErrorCode, OperationKind, OperationStatus, ProgressEvent, Reconciler,
    ResourceHandlerRequest, ServiceError,
};
use std::collections::BTreeMap;

const APP_ARN: &str = "arn:aws:amplify:us-east-1:123456789012:apps/d2abc";

fn reconciler() -> Reconciler<AppHandler> {
    Reconciler::new(AppHandler::new(HandlerSettings::default().app))
}

fn remote_app(tags: &[(&str, &str)]) -> App {
    App {
        app_id: "d2abc".into(),
        app_arn: APP_ARN.into(),
        name: "site".into(),
        platform: "WEB".into(),
        default_domain: "d2abc.amplifyapp.com".into(),
        tags: tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
        ..App::default()
    }
}

#[tokio::test]
async fn test_create_rejects_app_id_before_any_call() {
    let reconciler = reconciler();
    let amplify = MockAmplify::new();
    let model = AppModel {
        app_id: Some("d2abc".into()),
        ..AppModel::named("site")
    };

    let event = reconciler
        .handle_request(
            OperationKind::Create,
            &amplify,
            ResourceHandlerRequest::new(model),
            CallbackContext::new(),
        )
        .await;

    assert_eq!(event.error_code(), Some(HandlerErrorCode::InvalidRequest));
    assert!(event.message().unwrap().contains("AppId"));
    assert!(amplify.calls().is_empty());
}

#[tokio::test]
async fn test_create_requires_name() {
    let reconciler = reconciler();
    let amplify = MockAmplify::new();

    let event = reconciler
        .handle_request(
            OperationKind::Create,
            &amplify,
            ResourceHandlerRequest::new(AppModel::default()),
            CallbackContext::new(),
        )
        .await;

    assert_eq!(event.error_code(), Some(HandlerErrorCode::InvalidRequest));
    assert!(amplify.calls().is_empty());
}

#[tokio::test]
async fn test_create_is_ready_immediately_and_reads_back() {
    let reconciler = reconciler();
    let amplify = MockAmplify::new();
    amplify.expect_create_app().return_ok(Reply::App(remote_app(&[])));
    amplify.expect_get_app().return_ok(Reply::App(remote_app(&[])));

    let event = reconciler
        .handle_request(
            OperationKind::Create,
            &amplify,
            ResourceHandlerRequest::new(AppModel::named("site")),
            CallbackContext::new(),
        )
        .await;

    assert_eq!(event.status(), OperationStatus::Success);
    let model = event.resource_model().unwrap();
    assert_eq!(model.app_id.as_deref(), Some("d2abc"));
    assert_eq!(model.arn.as_deref(), Some(APP_ARN));
    assert_eq!(model.default_domain.as_deref(), Some("d2abc.amplifyapp.com"));
    assert_eq!(amplify.calls(), vec![Operation::CreateApp, Operation::GetApp]);
    amplify.verify();
}

#[tokio::test]
async fn test_update_reconciles_tags_around_update_call() {
    let reconciler = reconciler();
    let amplify = MockAmplify::new();
    let current = remote_app(&[
        ("team", "web"),
        ("owner", "alice"),
        ("aws:cloudformation:stack-name", "demo"),
    ]);
    amplify.expect_get_app().return_ok(Reply::App(current.clone()));
    amplify.expect_update_app().return_ok(Reply::App(current));
    amplify.expect_untag_resource().return_ok(Reply::Empty);
    amplify.expect_tag_resource().return_ok(Reply::Empty);
    amplify
        .expect_get_app()
        .return_ok(Reply::App(remote_app(&[("team", "marketing")])));

    let desired = AppModel {
        app_id: Some("d2abc".into()),
        tags: Some(vec![Tag::new("team", "marketing")]),
        ..AppModel::named("site")
    };
    let event = reconciler
        .handle_request(
            OperationKind::Update,
            &amplify,
            ResourceHandlerRequest::new(desired),
            CallbackContext::new(),
        )
        .await;

    assert_eq!(event.status(), OperationStatus::Success);
    assert_eq!(
        amplify.calls(),
        vec![
            Operation::GetApp,
            Operation::UpdateApp,
            Operation::UntagResource,
            Operation::TagResource,
            Operation::GetApp,
        ]
    );
    amplify.verify();
}

#[tokio::test]
async fn test_update_of_missing_app_fails_before_mutating() {
    let reconciler = reconciler();
    let amplify = MockAmplify::new();
    amplify
        .expect_get_app()
        .return_err(ServiceError::not_found("App d2abc not found."));

    let event = reconciler
        .handle_request(
            OperationKind::Update,
            &amplify,
            ResourceHandlerRequest::new(AppModel {
                app_id: Some("d2abc".into()),
                ..AppModel::named("site")
            }),
            CallbackContext::new(),
        )
        .await;

    assert_eq!(event.error_code(), Some(HandlerErrorCode::NotFound));
    assert_eq!(amplify.call_count(Operation::UpdateApp), 0);
}

#[tokio::test]
async fn test_delete_polls_until_app_is_gone() {
    let reconciler = reconciler();
    let amplify = MockAmplify::new();
    let model = AppModel {
        arn: Some(APP_ARN.into()),
        ..AppModel::default()
    };
    amplify.expect_delete_app().return_ok(Reply::Empty);
    amplify.expect_get_app().return_ok(Reply::App(remote_app(&[])));

    let first = reconciler
        .handle_request(
            OperationKind::Delete,
            &amplify,
            ResourceHandlerRequest::new(model.clone()),
            CallbackContext::new(),
        )
        .await;

    assert_eq!(first.status(), OperationStatus::InProgress);
    assert_eq!(first.callback_delay_seconds(), 5);
    let context = first.callback_context().cloned().unwrap();

    amplify
        .expect_get_app()
        .return_err(ServiceError::not_found("App d2abc not found."));

    let second = reconciler
        .handle_request(
            OperationKind::Delete,
            &amplify,
            ResourceHandlerRequest::new(model),
            context,
        )
        .await;

    assert_eq!(second.status(), OperationStatus::Success);
    assert_eq!(amplify.call_count(Operation::DeleteApp), 1);
    assert_eq!(amplify.call_count(Operation::GetApp), 2);
    amplify.verify();
}

#[tokio::test]
async fn test_list_passes_next_token_through() {
    let reconciler = reconciler();
    let amplify = MockAmplify::new();
    amplify.expect_list_apps().return_ok(Reply::Apps(Listing {
        items: vec![remote_app(&[])],
        next_token: Some("1".into()),
    }));

    let event = reconciler
        .handle_request(
            OperationKind::List,
            &amplify,
            ResourceHandlerRequest::new(AppModel::default()),
            CallbackContext::new(),
        )
        .await;

    match event {
        ProgressEvent::Success {
            resource_models: Some(models),
            next_token,
            ..
        } => {
            assert_eq!(models.len(), 1);
            assert_eq!(next_token.as_deref(), Some("1"));
        }
        other => panic!("unexpected event {other:?}"),
    }
    amplify.verify();
}
