use serde::{Deserialize, Serialize};

use crate::types::{
    DateWindow, MatchType, ModelUsage, PostSelectionType, ReplyCountCondition, ReplyType,
    TriggerType,
};
use crate::Platform;

/// Body submitted for comment-reply automations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentReplyPayload {
    pub automation_id: Option<String>,
    pub name: String,
    pub platform: Platform,
    pub description: String,
    pub platform_user_id: String,
    pub provider_id: String,
    pub trigger_type: TriggerType,
    pub reply_type: ReplyType,
    pub custom_message: Option<String>,
    /// Comma-joined keyword list, `null` for AI-decision triggers.
    pub keywords: Option<String>,
    pub match_type: MatchType,
    pub post_selection_type: PostSelectionType,
    pub specific_post_ids: Vec<String>,
    pub date_range: Option<DateWindow>,
    pub ai_context_rules: Option<String>,
    pub system_prompt: String,
    pub max_replies_per_post: Option<i64>,
    pub reply_count_condition: ReplyCountCondition,
    pub reply_count_value: i64,
    pub model_provider: String,
    pub model_name: String,
    pub temperature: f64,
    pub is_rag_enabled: bool,
    pub confidence_threshold: f64,
    pub model_usage: ModelUsage,
    pub max_actions: Option<i64>,
    pub time_period_seconds: Option<i64>,
    pub user_cooldown_seconds: Option<i64>,
}
