//! Talks to the automation backend and keeps the local list of deployed
//! automations in step with it.
//!
//! Lifecycle actions (pause, reactivate, delete) are applied to the local
//! [`DeployedRuleStore`] before the network call and compensated if the
//! backend refuses them.

pub mod api;
pub mod error;
pub mod http;
pub mod knowledge;
pub mod lifecycle;
pub mod store;

pub use api::{ActivationAction, AutomationApi};
pub use error::{ClientError, LifecycleError};
pub use http::HttpAutomationClient;
pub use knowledge::{upload_batch, KnowledgeDocument};
pub use lifecycle::{LifecycleAction, PendingCommand, RuleLifecycle};
pub use store::{DeployedRuleStore, Rollback};
