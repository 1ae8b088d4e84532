use chrono::{DateTime, Utc};
use replyline_core::serde_utils::{float, int_or_zero, optional_float, optional_int};
use serde::{Deserialize, Serialize};

use crate::payload::{
    CommentReplyPayload, CommentToDmPayload, DmKeywordPayload, ReplyTemplateContent,
    SubmitPayload,
};
use crate::types::{
    ActivationStatus, AutomationKind, DateWindow, HealthStatus, MatchType, ModelUsage,
    PostSelectionType, ReplyCountCondition, ReplyType, ScheduleType, TemplateType, TriggerType,
};
use crate::Platform;

/// Keywords arrive comma-joined on comment rules and as a list on DM rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum KeywordsWire {
    List(Vec<String>),
    Joined(String),
}

impl KeywordsWire {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            KeywordsWire::List(items) => items,
            KeywordsWire::Joined(joined) => joined
                .split(',')
                .map(|keyword| keyword.trim().to_string())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
        }
    }
}

/// Union of every configuration field any automation kind carries.
///
/// Used to read back deployed automations for editing. Every field is
/// optional because each kind only sends a subset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WireConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub trigger_type: Option<TriggerType>,
    #[serde(default)]
    pub reply_type: Option<ReplyType>,
    #[serde(default)]
    pub custom_message: Option<String>,
    #[serde(default)]
    pub keywords: Option<KeywordsWire>,
    #[serde(default)]
    pub match_type: Option<MatchType>,
    #[serde(default)]
    pub post_selection_type: Option<PostSelectionType>,
    #[serde(default)]
    pub specific_post_ids: Vec<String>,
    #[serde(default)]
    pub date_range: Option<DateWindow>,
    #[serde(default)]
    pub ai_context_rules: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default, deserialize_with = "optional_int")]
    pub max_replies_per_post: Option<i64>,
    #[serde(default)]
    pub reply_count_condition: Option<ReplyCountCondition>,
    #[serde(default, deserialize_with = "optional_int")]
    pub reply_count_value: Option<i64>,
    #[serde(default)]
    pub model_provider: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default, deserialize_with = "optional_float")]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub is_rag_enabled: Option<bool>,
    #[serde(default, deserialize_with = "optional_float")]
    pub confidence_threshold: Option<f64>,
    #[serde(default)]
    pub model_usage: Option<ModelUsage>,
    #[serde(default, deserialize_with = "optional_int")]
    pub max_actions: Option<i64>,
    #[serde(default, deserialize_with = "optional_int")]
    pub time_period_seconds: Option<i64>,
    #[serde(default, deserialize_with = "optional_int")]
    pub user_cooldown_seconds: Option<i64>,
    #[serde(default)]
    pub reply_template_type: Option<TemplateType>,
    #[serde(default)]
    pub reply_template_content: Option<ReplyTemplateContent>,
    #[serde(default)]
    pub schedule_type: Option<ScheduleType>,
    #[serde(default, deserialize_with = "optional_int")]
    pub delay_seconds: Option<i64>,
}

impl From<CommentReplyPayload> for WireConfig {
    fn from(p: CommentReplyPayload) -> Self {
        Self {
            name: p.name,
            description: Some(p.description),
            trigger_type: Some(p.trigger_type),
            reply_type: Some(p.reply_type),
            custom_message: p.custom_message,
            keywords: p.keywords.map(KeywordsWire::Joined),
            match_type: Some(p.match_type),
            post_selection_type: Some(p.post_selection_type),
            specific_post_ids: p.specific_post_ids,
            date_range: p.date_range,
            ai_context_rules: p.ai_context_rules,
            system_prompt: Some(p.system_prompt),
            max_replies_per_post: p.max_replies_per_post,
            reply_count_condition: Some(p.reply_count_condition),
            reply_count_value: Some(p.reply_count_value),
            model_provider: Some(p.model_provider),
            model_name: Some(p.model_name),
            temperature: Some(p.temperature),
            is_rag_enabled: Some(p.is_rag_enabled),
            confidence_threshold: Some(p.confidence_threshold),
            model_usage: Some(p.model_usage),
            max_actions: p.max_actions,
            time_period_seconds: p.time_period_seconds,
            user_cooldown_seconds: p.user_cooldown_seconds,
            ..Self::default()
        }
    }
}

impl From<DmKeywordPayload> for WireConfig {
    fn from(p: DmKeywordPayload) -> Self {
        Self {
            name: p.name,
            description: Some(p.description),
            trigger_type: Some(p.trigger_type),
            keywords: Some(KeywordsWire::List(p.keywords)),
            match_type: Some(p.match_type),
            ai_context_rules: p.ai_context_rules,
            system_prompt: Some(p.system_prompt),
            model_usage: Some(p.model_usage),
            user_cooldown_seconds: p.user_cooldown_seconds,
            reply_template_type: p.reply_template_type,
            reply_template_content: p.reply_template_content,
            ..Self::default()
        }
    }
}

impl From<CommentToDmPayload> for WireConfig {
    fn from(p: CommentToDmPayload) -> Self {
        Self {
            name: p.name,
            description: Some(p.description),
            trigger_type: Some(p.trigger_type),
            keywords: p.keywords.map(KeywordsWire::Joined),
            match_type: Some(p.match_type),
            ai_context_rules: p.ai_context_rules,
            post_selection_type: Some(p.post_selection_type),
            specific_post_ids: p.specific_post_ids,
            date_range: p.date_range,
            system_prompt: Some(p.system_prompt),
            model_provider: Some(p.model_provider),
            model_name: Some(p.model_name),
            temperature: Some(p.temperature),
            is_rag_enabled: Some(p.is_rag_enabled),
            confidence_threshold: Some(p.confidence_threshold),
            model_usage: Some(p.model_usage),
            reply_template_type: p.reply_template_type,
            reply_template_content: p.reply_template_content,
            schedule_type: Some(p.schedule_type),
            delay_seconds: p.delay_seconds,
            max_actions: p.max_actions,
            time_period_seconds: p.time_period_seconds,
            user_cooldown_seconds: p.user_cooldown_seconds,
            ..Self::default()
        }
    }
}

impl From<SubmitPayload> for WireConfig {
    fn from(payload: SubmitPayload) -> Self {
        match payload {
            SubmitPayload::CommentReply(p) => p.into(),
            SubmitPayload::DmKeywordReply(p) => p.into(),
            SubmitPayload::CommentToDm(p) => p.into(),
        }
    }
}

/// Deployed automation as listed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeployedRuleRecord {
    pub automation_id: String,
    pub platform: Platform,
    pub automation_type: AutomationKind,
    #[serde(flatten)]
    pub config: WireConfig,
    pub activation_status: ActivationStatus,
    #[serde(default)]
    pub health_status: HealthStatus,
    #[serde(default, deserialize_with = "int_or_zero")]
    pub execution_count: i64,
    #[serde(default = "zero_cost", deserialize_with = "float")]
    pub cumulative_cost: f64,
    #[serde(default)]
    pub last_triggered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

fn zero_cost() -> f64 {
    0.0
}
