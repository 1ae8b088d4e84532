use chrono::{DateTime, Utc};
use replyline_core::Platform;
use replyline_protocol::record::DeployedRuleRecord;
use replyline_protocol::types::{ActivationStatus, AutomationKind, HealthStatus};

use crate::draft::RuleDraft;
use crate::editor::EditorState;
use crate::error::HydrateError;
use crate::serializer::hydrate;

/// Read-only execution signals computed by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTelemetry {
    pub health_status: HealthStatus,
    pub execution_count: i64,
    pub cumulative_cost: f64,
    pub last_triggered_at: Option<DateTime<Utc>>,
}

/// Automation as it exists on the backend, mirrored locally.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployedRule {
    pub automation_id: String,
    pub platform: Platform,
    pub kind: AutomationKind,
    pub config: RuleDraft,
    pub activation_status: ActivationStatus,
    pub telemetry: RuleTelemetry,
    pub created_at: DateTime<Utc>,
}

impl DeployedRule {
    /// Opens an editor session on this rule's configuration.
    pub fn edit(&self) -> EditorState {
        EditorState::from_deployed(self)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn is_active(&self) -> bool {
        self.activation_status == ActivationStatus::Active
    }
}

impl TryFrom<DeployedRuleRecord> for DeployedRule {
    type Error = HydrateError;

    fn try_from(record: DeployedRuleRecord) -> Result<Self, Self::Error> {
        let config = hydrate(Some(record.automation_id.as_str()), &record.config)?;
        Ok(Self {
            automation_id: record.automation_id,
            platform: record.platform,
            kind: record.automation_type,
            config,
            activation_status: record.activation_status,
            telemetry: RuleTelemetry {
                health_status: record.health_status,
                execution_count: record.execution_count,
                cumulative_cost: record.cumulative_cost,
                last_triggered_at: record.last_triggered_at,
            },
            created_at: record.created_at,
        })
    }
}
