//! # Amplify Resource Handlers
//!
//! Provisioning handlers for three AWS Amplify resource types, built on
//! [`handler_framework`]:
//!
//! | Type                    | Handler                            | Stabilizes                  |
//! |-------------------------|------------------------------------|-----------------------------|
//! | `AWS::Amplify::App`     | [`app_handler::AppHandler`]        | delete only                 |
//! | `AWS::Amplify::Branch`  | [`branch_handler::BranchHandler`]  | delete only                 |
//! | `AWS::Amplify::Domain`  | [`domain_handler::DomainHandler`]  | create, update and delete   |
//!
//! ## Modules
//!
//! - **[model]**: resource models in the provider schema's shape, plus ARN helpers.
//! - **[service]**: the [`AmplifyApi`](service::AmplifyApi) client trait, the service's
//!   request/response shapes, an in-process [emulator](service::emulator) and a scripted
//!   [mock](service::mock).
//! - **[tagging]**: tag diffing shared by the app and branch handlers.
//! - **[settings]**: polling delays and timeouts per resource type.
//! - **[lifecycle]**: [`AmplifySystem`](lifecycle::AmplifySystem), which wires the
//!   handlers to a running emulator.
//!
//! ## Testing
//!
//! Handler step order and poll counts are tested against
//! [`MockAmplify`](service::mock::MockAmplify); full lifecycles run against the emulator
//! through [`AmplifySystem`](lifecycle::AmplifySystem).

pub mod app_handler;
pub mod branch_handler;
pub mod domain_handler;
pub mod lifecycle;
pub mod model;
pub mod service;
pub mod settings;
pub mod tagging;

pub use app_handler::AppHandler;
pub use branch_handler::BranchHandler;
pub use domain_handler::DomainHandler;
pub use settings::{HandlerSettings, SettingsError};
