use async_trait::async_trait;
use replyline_protocol::envelope::ApiEnvelope;
use replyline_protocol::knowledge::{KnowledgeUploadRequest, KnowledgeUploadResponse};
use replyline_protocol::payload::SubmitPayload;
use replyline_protocol::record::DeployedRuleRecord;
use replyline_protocol::types::{ActivationStatus, AutomationKind};
use serde_json::Value;

use crate::error::ClientError;

/// Remote activation switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationAction {
    Pause,
    Activate,
}

impl ActivationAction {
    pub fn path_segment(&self) -> &'static str {
        match self {
            ActivationAction::Pause => "pause",
            ActivationAction::Activate => "activate",
        }
    }

    pub fn target_status(&self) -> ActivationStatus {
        match self {
            ActivationAction::Pause => ActivationStatus::Paused,
            ActivationAction::Activate => ActivationStatus::Active,
        }
    }
}

/// Request/response contract of the automation backend.
///
/// Every call answers with a `{success, message, data}` envelope; transport
/// failures are `Err`, a `success: false` answer is an `Ok` envelope.
#[async_trait]
pub trait AutomationApi: Send + Sync {
    async fn submit(
        &self,
        payload: &SubmitPayload,
    ) -> Result<ApiEnvelope<DeployedRuleRecord>, ClientError>;

    async fn list(
        &self,
        platform_user_id: &str,
    ) -> Result<ApiEnvelope<Vec<DeployedRuleRecord>>, ClientError>;

    async fn set_activation(
        &self,
        kind: AutomationKind,
        automation_id: &str,
        action: ActivationAction,
    ) -> Result<ApiEnvelope<Value>, ClientError>;

    async fn delete(
        &self,
        kind: AutomationKind,
        automation_id: &str,
    ) -> Result<ApiEnvelope<Value>, ClientError>;

    async fn upload_knowledge(
        &self,
        request: &KnowledgeUploadRequest,
    ) -> Result<ApiEnvelope<KnowledgeUploadResponse>, ClientError>;
}
