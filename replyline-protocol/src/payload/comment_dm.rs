use serde::{Deserialize, Serialize};

use super::template::ReplyTemplateContent;
use crate::types::{
    DateWindow, MatchType, ModelUsage, PostSelectionType, ScheduleType, TemplateType, TriggerType,
};
use crate::Platform;

/// Body submitted for automations that answer a comment with a private DM.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentToDmPayload {
    pub automation_id: Option<String>,
    pub name: String,
    pub platform: Platform,
    pub description: String,
    pub platform_user_id: String,
    pub provider_id: String,
    pub trigger_type: TriggerType,
    pub keywords: Option<String>,
    pub match_type: MatchType,
    pub ai_context_rules: Option<String>,
    pub post_selection_type: PostSelectionType,
    pub specific_post_ids: Vec<String>,
    pub date_range: Option<DateWindow>,
    pub system_prompt: String,
    pub reply_template_type: Option<TemplateType>,
    pub reply_template_content: Option<ReplyTemplateContent>,
    pub model_provider: String,
    pub model_name: String,
    pub temperature: f64,
    pub is_rag_enabled: bool,
    pub confidence_threshold: f64,
    pub model_usage: ModelUsage,
    pub schedule_type: ScheduleType,
    pub delay_seconds: Option<i64>,
    pub max_actions: Option<i64>,
    pub time_period_seconds: Option<i64>,
    pub user_cooldown_seconds: Option<i64>,
}
