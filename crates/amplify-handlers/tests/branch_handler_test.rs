use amplify_handlers::model::{BranchModel, Tag};
use amplify_handlers::service::mock::MockAmplify;
use amplify_handlers::service::types::{Branch, Listing};
use amplify_handlers::service::{Operation, Reply};
use amplify_handlers::{BranchHandler, HandlerSettings};
use handler_framework::{
    CallbackContext, HandlerErrorCode, OperationKind, OperationStatus, Reconciler,
    ResourceHandlerRequest, ServiceError, ServiceErrorKind,
};

const BRANCH_ARN: &str = "arn:aws:amplify:us-east-1:123456789012:apps/d2abc/branches/main";

fn reconciler() -> Reconciler<BranchHandler> {
    Reconciler::new(BranchHandler::new(HandlerSettings::default().branch))
}

fn remote_branch() -> Branch {
    Branch {
        branch_arn: BRANCH_ARN.into(),
        branch_name: "main".into(),
        stage: Some("PRODUCTION".into()),
        enable_auto_build: true,
        ..Branch::default()
    }
}

#[tokio::test]
async fn test_create_returns_branch_with_arn() {
    let reconciler = reconciler();
    let amplify = MockAmplify::new();
    amplify
        .expect_create_branch()
        .return_ok(Reply::Branch(remote_branch()));
    amplify
        .expect_get_branch()
        .return_ok(Reply::Branch(remote_branch()));

    let event = reconciler
        .handle_request(
            OperationKind::Create,
            &amplify,
            ResourceHandlerRequest::new(BranchModel::new("d2abc", "main")),
            CallbackContext::new(),
        )
        .await;

    assert_eq!(event.status(), OperationStatus::Success);
    let model = event.resource_model().unwrap();
    assert_eq!(model.arn.as_deref(), Some(BRANCH_ARN));
    assert_eq!(model.app_id.as_deref(), Some("d2abc"));
    assert_eq!(model.stage.as_deref(), Some("PRODUCTION"));
    amplify.verify();
}

#[tokio::test]
async fn test_create_rejects_arn() {
    let reconciler = reconciler();
    let amplify = MockAmplify::new();
    let model = BranchModel {
        arn: Some(BRANCH_ARN.into()),
        ..BranchModel::new("d2abc", "main")
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
    assert!(event.message().unwrap().contains("Arn"));
    assert!(amplify.calls().is_empty());
}

#[tokio::test]
async fn test_duplicate_branch_maps_to_invalid_request() {
    let reconciler = reconciler();
    let amplify = MockAmplify::new();
    amplify.expect_create_branch().return_err(ServiceError::new(
        ServiceErrorKind::BadRequest,
        "Branch main already exists for app d2abc.",
    ));

    let event = reconciler
        .handle_request(
            OperationKind::Create,
            &amplify,
            ResourceHandlerRequest::new(BranchModel::new("d2abc", "main")),
            CallbackContext::new(),
        )
        .await;

    assert_eq!(event.error_code(), Some(HandlerErrorCode::InvalidRequest));
    let message = event.message().unwrap();
    assert!(message.contains("already exists"));
    assert!(message.contains("AWS::Amplify::Branch"));
    assert!(message.contains("d2abc/main"));
}

#[tokio::test]
async fn test_read_by_arn_only() {
    let reconciler = reconciler();
    let amplify = MockAmplify::new();
    amplify
        .expect_get_branch()
        .return_ok(Reply::Branch(remote_branch()));
    let model = BranchModel {
        arn: Some(BRANCH_ARN.into()),
        ..BranchModel::default()
    };

    let event = reconciler
        .handle_request(
            OperationKind::Read,
            &amplify,
            ResourceHandlerRequest::new(model),
            CallbackContext::new(),
        )
        .await;

    assert_eq!(event.status(), OperationStatus::Success);
    assert_eq!(
        event.resource_model().unwrap().branch_name.as_deref(),
        Some("main")
    );
}

#[tokio::test]
async fn test_read_missing_branch_is_not_found() {
    let reconciler = reconciler();
    let amplify = MockAmplify::new();
    amplify
        .expect_get_branch()
        .return_err(ServiceError::not_found("Branch main not found for app d2abc."));

    let event = reconciler
        .handle_request(
            OperationKind::Read,
            &amplify,
            ResourceHandlerRequest::new(BranchModel::new("d2abc", "main")),
            CallbackContext::new(),
        )
        .await;

    assert_eq!(event.error_code(), Some(HandlerErrorCode::NotFound));
    assert!(!event.error_code().unwrap().is_retryable());
}

#[tokio::test]
async fn test_update_adds_tags_only_when_changed() {
    let reconciler = reconciler();
    let amplify = MockAmplify::new();
    amplify
        .expect_get_branch()
        .return_ok(Reply::Branch(remote_branch()));
    amplify
        .expect_update_branch()
        .return_ok(Reply::Branch(remote_branch()));
    amplify.expect_tag_resource().return_ok(Reply::Empty);
    amplify
        .expect_get_branch()
        .return_ok(Reply::Branch(remote_branch()));

    let desired = BranchModel {
        tags: Some(vec![Tag::new("env", "prod")]),
        ..BranchModel::new("d2abc", "main")
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
    assert_eq!(amplify.call_count(Operation::UntagResource), 0);
    assert_eq!(amplify.call_count(Operation::TagResource), 1);
    amplify.verify();
}

#[tokio::test]
async fn test_list_requires_app_id_and_maps_items() {
    let reconciler = reconciler();
    let amplify = MockAmplify::new();

    let missing = reconciler
        .handle_request(
            OperationKind::List,
            &amplify,
            ResourceHandlerRequest::new(BranchModel::default()),
            CallbackContext::new(),
        )
        .await;
    assert_eq!(missing.error_code(), Some(HandlerErrorCode::InvalidRequest));

    amplify.expect_list_branches().return_ok(Reply::Branches(Listing {
        items: vec![remote_branch()],
        next_token: None,
    }));
    let listed = reconciler
        .handle_request(
            OperationKind::List,
            &amplify,
            ResourceHandlerRequest::new(BranchModel {
                app_id: Some("d2abc".into()),
                ..BranchModel::default()
            }),
            CallbackContext::new(),
        )
        .await;

    let models = listed.resource_models().unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].app_id.as_deref(), Some("d2abc"));
    amplify.verify();
}

#[tokio::test]
async fn test_delete_then_gone_on_first_poll() {
    let reconciler = reconciler();
    let amplify = MockAmplify::new();
    amplify.expect_delete_branch().return_ok(Reply::Empty);
    amplify
        .expect_get_branch()
        .return_err(ServiceError::not_found("Branch main not found for app d2abc."));

    let event = reconciler
        .handle_request(
            OperationKind::Delete,
            &amplify,
            ResourceHandlerRequest::new(BranchModel::new("d2abc", "main")),
            CallbackContext::new(),
        )
        .await;

    assert_eq!(event.status(), OperationStatus::Success);
    amplify.verify();
}
