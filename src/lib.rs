//! ReplyLine: authoring and lifecycle tooling for social media reply automations.
//!
//! An automation watches comments or direct messages for a trigger and
//! answers with an AI-generated or templated reply. The workspace is split
//! into:
//!
//! * `replyline_core`: configuration, logging bootstrap and shared serde helpers
//! * `replyline_protocol`: the wire contract of the automation backend
//! * `replyline_rules`: drafts, the editor reducer, validation and serialization
//! * `replyline_client`: the HTTP client, deployed-rule store and lifecycle commands

pub use replyline_client;
pub use replyline_core;
pub use replyline_protocol;
pub use replyline_rules;

pub use replyline_client::{HttpAutomationClient, RuleLifecycle};
pub use replyline_core::{ClientConfig, Platform};
pub use replyline_rules::{
    build_submission, reduce, validate, AccountContext, DeployedRule, DraftAction, EditorState,
    RuleDraft,
};
