use serde::{Deserialize, Serialize};

use super::template::ReplyTemplateContent;
use crate::types::{MatchType, ModelUsage, TemplateType, TriggerType};
use crate::Platform;

/// Body submitted for DM keyword-reply automations.
///
/// `reply_template_type` is `null` when the reply is AI generated from
/// `system_prompt`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DmKeywordPayload {
    pub automation_id: Option<String>,
    pub platform_user_id: String,
    pub provider_id: String,
    pub name: String,
    pub platform: Platform,
    pub keywords: Vec<String>,
    pub match_type: MatchType,
    pub trigger_type: TriggerType,
    pub ai_context_rules: Option<String>,
    pub system_prompt: String,
    pub reply_template_type: Option<TemplateType>,
    pub reply_template_content: Option<ReplyTemplateContent>,
    pub description: String,
    pub model_usage: ModelUsage,
    pub user_cooldown_seconds: Option<i64>,
}
