//! Resource models in the provider schema's shape (PascalCase properties).

pub mod app;
pub mod arn;
pub mod branch;
pub mod common;
pub mod domain;

pub use app::{AppIdentity, AppModel};
pub use branch::BranchModel;
pub use common::{EnvironmentVariable, Tag};
pub use domain::{DomainModel, SubDomainSetting};
