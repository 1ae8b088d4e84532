//! Draft to wire payload conversion, and its left inverse.
//!
//! [`hydrate`] reads back exactly what [`serialize`] wrote: for any draft `d`
//! that serializes for `kind`, hydrating the resulting wire config yields
//! `d.project(kind)` without its id.

use replyline_core::{ClientConfig, ConfigError, Platform};
use replyline_protocol::payload::{
    Attachment, ButtonPayload, ButtonType, CommentReplyPayload, CommentToDmPayload,
    DmKeywordPayload, ImagePayload, QuickReplyContentType, QuickReplyWire, ReplyTemplateContent,
    SubmitPayload, TemplateMessage, UrlButtonWire,
};
use replyline_protocol::record::{KeywordsWire, WireConfig};
use replyline_protocol::types::{
    AutomationKind, DateWindow, MatchType, PostSelectionType, ReplyType, ScheduleType,
    TemplateType, TriggerType,
};
use tracing::debug;

use crate::draft::{RuleDraft, NO_DESCRIPTION};
use crate::error::{DraftError, HydrateError, SerializeError};
use crate::model::ModelConfig;
use crate::response::{QuickReply, ResponseSpec, TemplateContent, UrlButton};
use crate::scope::{PostIdSet, PostSelection, RateLimit, Schedule, ScopeSpec};
use crate::trigger::{KeywordSet, TriggerSpec};
use crate::validator::validate;

/// `template_type` value the platform expects for link-button templates.
const BUTTON_TEMPLATE_TYPE: &str = "button";

/// Connected account the automation is created for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountContext {
    pub platform: Platform,
    pub platform_user_id: String,
    pub provider_id: String,
}

impl AccountContext {
    pub fn new(
        platform: Platform,
        platform_user_id: impl Into<String>,
        provider_id: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            platform_user_id: platform_user_id.into(),
            provider_id: provider_id.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.platform,
            config.require_platform_user_id()?,
            config.require_provider_id()?,
        ))
    }
}

/// Validates `draft` and serializes it for `kind`.
pub fn build_submission(
    kind: AutomationKind,
    draft: &RuleDraft,
    account: &AccountContext,
) -> Result<SubmitPayload, DraftError> {
    validate(draft)?;
    Ok(serialize(kind, draft, account)?)
}

/// Runs every check [`build_submission`] runs, without needing an account.
pub fn check_submission(kind: AutomationKind, draft: &RuleDraft) -> Result<(), DraftError> {
    validate(draft)?;
    ensure_supported(kind, draft)?;
    Ok(())
}

/// Rejects drafts that use a feature `kind` has no wire field for.
pub fn ensure_supported(kind: AutomationKind, draft: &RuleDraft) -> Result<(), SerializeError> {
    if !kind.targets_posts() && draft.scope.post_selection != PostSelection::All {
        return Err(SerializeError::ScopeNotSupported { kind });
    }
    // Comment replies carry a single text message.
    if kind == AutomationKind::CommentReply {
        if let Some(template) = draft.response.template() {
            if template.template_type() != TemplateType::Text {
                return Err(SerializeError::UnsupportedTemplate {
                    kind,
                    template: template.template_type(),
                });
            }
        }
    }
    Ok(())
}

/// Converts a draft into the payload for `kind`. Does not validate.
pub fn serialize(
    kind: AutomationKind,
    draft: &RuleDraft,
    account: &AccountContext,
) -> Result<SubmitPayload, SerializeError> {
    debug!(%kind, name = %draft.name, "serializing draft");
    ensure_supported(kind, draft)?;
    let payload = match kind {
        AutomationKind::CommentReply => SubmitPayload::CommentReply(comment_reply(draft, account)),
        AutomationKind::DmKeywordReply => SubmitPayload::DmKeywordReply(dm_keyword(draft, account)),
        AutomationKind::CommentToDm => SubmitPayload::CommentToDm(comment_to_dm(draft, account)),
    };
    Ok(payload)
}

/// Wire halves of a trigger: comma-joined keywords and AI context.
struct TriggerWire {
    trigger_type: TriggerType,
    keywords: Option<KeywordSet>,
    match_type: MatchType,
    ai_context_rules: Option<String>,
}

fn trigger_wire(trigger: &TriggerSpec) -> TriggerWire {
    match trigger {
        TriggerSpec::Keyword {
            keywords,
            match_type,
        } => TriggerWire {
            trigger_type: TriggerType::Keyword,
            keywords: Some(keywords.clone()),
            match_type: *match_type,
            ai_context_rules: None,
        },
        TriggerSpec::AiDecision { context } => TriggerWire {
            trigger_type: TriggerType::AiDecision,
            keywords: None,
            match_type: MatchType::default(),
            ai_context_rules: Some(context.clone()),
        },
    }
}

fn scope_wire(scope: &ScopeSpec) -> (PostSelectionType, Vec<String>, Option<DateWindow>) {
    match &scope.post_selection {
        PostSelection::All => (PostSelectionType::All, Vec::new(), None),
        PostSelection::Specific { ids } => {
            (PostSelectionType::Specific, ids.as_slice().to_vec(), None)
        }
        PostSelection::DateRange { window } => {
            (PostSelectionType::DateRange, Vec::new(), *window)
        }
    }
}

/// Template type, content and system prompt of a DM-bearing response.
fn dm_response_wire(
    response: &ResponseSpec,
) -> (Option<TemplateType>, Option<ReplyTemplateContent>, String) {
    match response {
        ResponseSpec::AiGenerated { system_prompt } => (None, None, system_prompt.clone()),
        ResponseSpec::StaticTemplate { template } => {
            let (template_type, content) = template_to_wire(template);
            (Some(template_type), Some(content), String::new())
        }
    }
}

fn comment_reply(draft: &RuleDraft, account: &AccountContext) -> CommentReplyPayload {
    let (reply_type, custom_message, system_prompt) = match &draft.response {
        ResponseSpec::AiGenerated { system_prompt } => {
            (ReplyType::AiDecision, None, system_prompt.clone())
        }
        ResponseSpec::StaticTemplate { template } => (
            ReplyType::Custom,
            template.message_text().map(str::to_string),
            String::new(),
        ),
    };
    let trigger = trigger_wire(&draft.trigger);
    let (post_selection_type, specific_post_ids, date_range) = scope_wire(&draft.scope);
    let limits = &draft.rate_limit;
    let model = &draft.model;

    CommentReplyPayload {
        automation_id: draft.id.clone(),
        name: draft.name.clone(),
        platform: account.platform,
        description: draft.description_or_default().to_string(),
        platform_user_id: account.platform_user_id.clone(),
        provider_id: account.provider_id.clone(),
        trigger_type: trigger.trigger_type,
        reply_type,
        custom_message,
        keywords: trigger.keywords.map(|keywords| keywords.joined()),
        match_type: trigger.match_type,
        post_selection_type,
        specific_post_ids,
        date_range,
        ai_context_rules: trigger.ai_context_rules,
        system_prompt,
        max_replies_per_post: limits.max_replies_per_post,
        reply_count_condition: limits.reply_count_condition,
        reply_count_value: limits.reply_count_value,
        model_provider: model.provider.clone(),
        model_name: model.model_name.clone(),
        temperature: model.temperature,
        is_rag_enabled: model.rag_enabled,
        confidence_threshold: model.confidence_threshold,
        model_usage: model.model_usage,
        max_actions: limits.max_actions,
        time_period_seconds: limits.time_period_seconds,
        user_cooldown_seconds: limits.user_cooldown_seconds,
    }
}

fn dm_keyword(draft: &RuleDraft, account: &AccountContext) -> DmKeywordPayload {
    let trigger = trigger_wire(&draft.trigger);
    let (reply_template_type, reply_template_content, system_prompt) =
        dm_response_wire(&draft.response);

    DmKeywordPayload {
        automation_id: draft.id.clone(),
        platform_user_id: account.platform_user_id.clone(),
        provider_id: account.provider_id.clone(),
        name: draft.name.clone(),
        platform: account.platform,
        keywords: trigger.keywords.map(Vec::<String>::from).unwrap_or_default(),
        match_type: trigger.match_type,
        trigger_type: trigger.trigger_type,
        ai_context_rules: trigger.ai_context_rules,
        system_prompt,
        reply_template_type,
        reply_template_content,
        description: draft.description_or_default().to_string(),
        model_usage: draft.model.model_usage,
        user_cooldown_seconds: draft.rate_limit.user_cooldown_seconds,
    }
}

fn comment_to_dm(draft: &RuleDraft, account: &AccountContext) -> CommentToDmPayload {
    let trigger = trigger_wire(&draft.trigger);
    let (post_selection_type, specific_post_ids, date_range) = scope_wire(&draft.scope);
    let (reply_template_type, reply_template_content, system_prompt) =
        dm_response_wire(&draft.response);
    let (schedule_type, delay_seconds) = match draft.schedule {
        Schedule::Immediate => (ScheduleType::Immediate, None),
        Schedule::Delayed { delay_seconds } => (ScheduleType::Delayed, Some(delay_seconds)),
    };
    let limits = &draft.rate_limit;
    let model = &draft.model;

    CommentToDmPayload {
        automation_id: draft.id.clone(),
        name: draft.name.clone(),
        platform: account.platform,
        description: draft.description_or_default().to_string(),
        platform_user_id: account.platform_user_id.clone(),
        provider_id: account.provider_id.clone(),
        trigger_type: trigger.trigger_type,
        keywords: trigger.keywords.map(|keywords| keywords.joined()),
        match_type: trigger.match_type,
        ai_context_rules: trigger.ai_context_rules,
        post_selection_type,
        specific_post_ids,
        date_range,
        system_prompt,
        reply_template_type,
        reply_template_content,
        model_provider: model.provider.clone(),
        model_name: model.model_name.clone(),
        temperature: model.temperature,
        is_rag_enabled: model.rag_enabled,
        confidence_threshold: model.confidence_threshold,
        model_usage: model.model_usage,
        schedule_type,
        delay_seconds,
        max_actions: limits.max_actions,
        time_period_seconds: limits.time_period_seconds,
        user_cooldown_seconds: limits.user_cooldown_seconds,
    }
}

/// Maps template content to exactly one of the four platform message shapes.
pub fn template_to_wire(template: &TemplateContent) -> (TemplateType, ReplyTemplateContent) {
    let message = match template {
        TemplateContent::Text { text } => TemplateMessage::Text { text: text.clone() },
        TemplateContent::Image { image_url } => TemplateMessage::Attachment {
            attachment: Attachment::Image {
                payload: ImagePayload {
                    url: image_url.clone(),
                    is_reusable: true,
                },
            },
        },
        TemplateContent::ButtonTemplate { text, buttons } => TemplateMessage::Attachment {
            attachment: Attachment::Template {
                payload: ButtonPayload {
                    template_type: BUTTON_TEMPLATE_TYPE.to_string(),
                    text: text.clone(),
                    buttons: buttons
                        .iter()
                        .map(|button| UrlButtonWire {
                            kind: ButtonType::WebUrl,
                            url: button.link.clone(),
                            title: button.text.clone(),
                        })
                        .collect(),
                },
            },
        },
        TemplateContent::QuickReplies { text, replies } => TemplateMessage::QuickReplies {
            text: text.clone(),
            quick_replies: replies
                .iter()
                .map(|reply| QuickReplyWire {
                    content_type: QuickReplyContentType::Text,
                    title: reply.text.clone(),
                    payload: reply.payload.clone(),
                })
                .collect(),
        },
    };
    (template.template_type(), ReplyTemplateContent { message })
}

/// Reads template content back, checking it has the shape `declared` promises.
pub fn template_from_wire(
    declared: TemplateType,
    content: ReplyTemplateContent,
) -> Result<TemplateContent, HydrateError> {
    let template = match (declared, content.message) {
        (TemplateType::Text, TemplateMessage::Text { text }) => TemplateContent::Text { text },
        (
            TemplateType::Image,
            TemplateMessage::Attachment {
                attachment: Attachment::Image { payload },
            },
        ) => TemplateContent::Image {
            image_url: payload.url,
        },
        (
            TemplateType::ButtonTemplate,
            TemplateMessage::Attachment {
                attachment: Attachment::Template { payload },
            },
        ) => TemplateContent::ButtonTemplate {
            text: payload.text,
            buttons: payload
                .buttons
                .into_iter()
                .map(|button| UrlButton::new(button.title, button.url))
                .collect(),
        },
        (TemplateType::QuickReplies, TemplateMessage::QuickReplies { text, quick_replies }) => {
            TemplateContent::QuickReplies {
                text,
                replies: quick_replies
                    .into_iter()
                    .map(|reply| QuickReply::new(reply.title, reply.payload))
                    .collect(),
            }
        }
        // Some clients omit an empty quick_replies array.
        (TemplateType::QuickReplies, TemplateMessage::Text { text }) => {
            TemplateContent::QuickReplies {
                text,
                replies: Vec::new(),
            }
        }
        (declared, _) => return Err(HydrateError::TemplateMismatch { declared }),
    };
    Ok(template)
}

/// Builds an editable draft from a wire config; `id` is the deployed
/// automation's identifier, if any.
pub fn hydrate(id: Option<&str>, wire: &WireConfig) -> Result<RuleDraft, HydrateError> {
    let trigger = match wire.trigger_type.unwrap_or(TriggerType::Keyword) {
        TriggerType::Keyword => TriggerSpec::Keyword {
            keywords: wire
                .keywords
                .clone()
                .map(KeywordsWire::into_vec)
                .map(KeywordSet::from)
                .unwrap_or_default(),
            match_type: wire.match_type.unwrap_or_default(),
        },
        TriggerType::AiDecision => TriggerSpec::AiDecision {
            context: wire.ai_context_rules.clone().unwrap_or_default(),
        },
    };

    let response = match (wire.reply_template_type, wire.reply_type) {
        (Some(template_type), _) => {
            let content = wire
                .reply_template_content
                .clone()
                .ok_or(HydrateError::MissingTemplateContent(template_type))?;
            ResponseSpec::StaticTemplate {
                template: template_from_wire(template_type, content)?,
            }
        }
        (None, Some(ReplyType::Custom)) => ResponseSpec::StaticTemplate {
            template: TemplateContent::text(wire.custom_message.clone().unwrap_or_default()),
        },
        (None, _) => ResponseSpec::AiGenerated {
            system_prompt: wire.system_prompt.clone().unwrap_or_default(),
        },
    };

    let post_selection = match wire.post_selection_type.unwrap_or(PostSelectionType::All) {
        PostSelectionType::All => PostSelection::All,
        PostSelectionType::Specific => PostSelection::Specific {
            ids: PostIdSet::from(wire.specific_post_ids.clone()),
        },
        PostSelectionType::DateRange => PostSelection::DateRange {
            window: wire.date_range,
        },
    };

    let rate_limit = RateLimit {
        max_actions: wire.max_actions,
        time_period_seconds: wire.time_period_seconds,
        user_cooldown_seconds: wire.user_cooldown_seconds,
        max_replies_per_post: wire.max_replies_per_post,
        reply_count_condition: wire.reply_count_condition.unwrap_or_default(),
        reply_count_value: wire
            .reply_count_value
            .unwrap_or_else(RateLimit::default_reply_count_value),
    };

    let defaults = ModelConfig::default();
    let model = ModelConfig {
        provider: wire.model_provider.clone().unwrap_or(defaults.provider),
        model_name: wire.model_name.clone().unwrap_or(defaults.model_name),
        temperature: wire.temperature.unwrap_or(defaults.temperature),
        confidence_threshold: wire
            .confidence_threshold
            .unwrap_or(defaults.confidence_threshold),
        rag_enabled: wire.is_rag_enabled.unwrap_or(defaults.rag_enabled),
        model_usage: wire.model_usage.unwrap_or(defaults.model_usage),
    };

    let schedule = match wire.schedule_type {
        Some(ScheduleType::Delayed) => Schedule::Delayed {
            delay_seconds: wire.delay_seconds.ok_or(HydrateError::MissingDelay)?,
        },
        Some(ScheduleType::Immediate) | None => Schedule::Immediate,
    };

    let description = match wire.description.as_deref() {
        None | Some(NO_DESCRIPTION) => String::new(),
        Some(text) => text.to_string(),
    };

    let mut draft = RuleDraft {
        id: id.map(str::to_string),
        name: wire.name.clone(),
        description,
        trigger,
        response,
        scope: ScopeSpec { post_selection },
        rate_limit,
        model,
        schedule,
    };
    draft.normalize();
    Ok(draft)
}
