//! Immutable-update reducer for one editor session.
//!
//! The draft is only ever changed through [`reduce`]. Switching the trigger
//! or response kind keeps every field outside that union untouched and
//! remembers the side that was switched away from, so switching back can
//! restore it.

use replyline_protocol::types::{
    DateWindow, MatchType, ModelUsage, ReplyCountCondition, TemplateType, TriggerType,
};
use tracing::debug;

use crate::deployed::DeployedRule;
use crate::draft::RuleDraft;
use crate::response::{QuickReply, ResponseKind, ResponseSpec, TemplateContent, UrlButton};
use crate::scope::{PostIdSet, PostSelection, Schedule};
use crate::trigger::{context_from_keywords, keywords_from_context, KeywordSet, TriggerSpec};

/// Integer rate-limit fields that share the "absent means unlimited" rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitField {
    MaxActions,
    TimePeriodSeconds,
    UserCooldownSeconds,
    MaxRepliesPerPost,
}

/// Every edit an editor session can make.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftAction {
    SetName(String),
    SetDescription(String),

    SwitchTrigger(TriggerType),
    AddKeywords(String),
    RemoveKeyword(String),
    SetMatchType(MatchType),
    SetAiContext(String),

    SwitchResponse(ResponseKind),
    SetSystemPrompt(String),
    SwitchTemplate(TemplateType),
    SetTemplateText(String),
    SetImageUrl(String),
    AddButton(UrlButton),
    UpdateButton { index: usize, button: UrlButton },
    AddQuickReply(QuickReply),
    UpdateQuickReply { index: usize, reply: QuickReply },
    RemoveButton(usize),

    SelectAllPosts,
    SelectSpecificPosts,
    TogglePost(String),
    SelectDateRange(Option<DateWindow>),

    SetRateLimit(RateLimitField, Option<i64>),
    SetReplyCountCondition(ReplyCountCondition),
    SetReplyCountValue(i64),

    SetModel { provider: String, model_name: String },
    SetTemperature(f64),
    SetConfidenceThreshold(f64),
    SetRagEnabled(bool),
    SetModelUsage(ModelUsage),

    SetSchedule(Schedule),
}

/// Values set aside when a union is switched away from.
#[derive(Debug, Clone, Default, PartialEq)]
struct SwitchStash {
    keywords: Option<(KeywordSet, MatchType)>,
    context: Option<String>,
    system_prompt: Option<String>,
    template: Option<TemplateContent>,
    specific_posts: Option<PostIdSet>,
}

/// Draft plus the session-local memory used by kind switches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    pub draft: RuleDraft,
    stash: SwitchStash,
}

impl EditorState {
    /// Session for a brand new rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session editing an existing draft (typically a hydrated deployed rule).
    pub fn from_draft(draft: RuleDraft) -> Self {
        Self {
            draft,
            stash: SwitchStash::default(),
        }
    }

    pub fn from_deployed(rule: &DeployedRule) -> Self {
        Self::from_draft(rule.config.clone())
    }

    pub fn apply(self, action: DraftAction) -> Self {
        reduce(self, action)
    }

    pub fn apply_all<I>(self, actions: I) -> Self
    where
        I: IntoIterator<Item = DraftAction>,
    {
        actions.into_iter().fold(self, reduce)
    }

    pub fn into_draft(self) -> RuleDraft {
        self.draft
    }
}

/// `(state, action) -> state`.
pub fn reduce(mut state: EditorState, action: DraftAction) -> EditorState {
    match action {
        DraftAction::SetName(name) => state.draft.name = name,
        DraftAction::SetDescription(description) => state.draft.description = description,

        DraftAction::SwitchTrigger(target) => switch_trigger(&mut state, target),
        DraftAction::AddKeywords(input) => {
            if let TriggerSpec::Keyword { keywords, .. } = &mut state.draft.trigger {
                if keywords.insert_text(&input) > 0 {
                    state.stash.context = None;
                }
            }
        }
        DraftAction::RemoveKeyword(keyword) => {
            if let TriggerSpec::Keyword { keywords, .. } = &mut state.draft.trigger {
                if keywords.remove(&keyword) {
                    state.stash.context = None;
                }
            }
        }
        DraftAction::SetMatchType(value) => {
            if let TriggerSpec::Keyword { match_type, .. } = &mut state.draft.trigger {
                *match_type = value;
            }
        }
        DraftAction::SetAiContext(value) => {
            if let TriggerSpec::AiDecision { context } = &mut state.draft.trigger {
                if *context != value {
                    *context = value;
                    // The keywords set aside were tied to the old context.
                    state.stash.keywords = None;
                }
            }
        }

        DraftAction::SwitchResponse(target) => switch_response(&mut state, target),
        DraftAction::SetSystemPrompt(value) => {
            if let ResponseSpec::AiGenerated { system_prompt } = &mut state.draft.response {
                *system_prompt = value;
            }
        }
        DraftAction::SwitchTemplate(target) => {
            if let Some(template) = state.draft.response.template_mut() {
                if template.template_type() != target {
                    debug!(from = ?template.template_type(), to = ?target, "switching reply template");
                    *template = template.convert(target);
                }
            }
        }
        DraftAction::SetTemplateText(value) => {
            if let Some(template) = state.draft.response.template_mut() {
                match template {
                    TemplateContent::Text { text }
                    | TemplateContent::ButtonTemplate { text, .. }
                    | TemplateContent::QuickReplies { text, .. } => *text = value,
                    TemplateContent::Image { .. } => {}
                }
            }
        }
        DraftAction::SetImageUrl(value) => {
            if let Some(TemplateContent::Image { image_url }) = state.draft.response.template_mut()
            {
                *image_url = value;
            }
        }
        DraftAction::AddButton(button) => {
            if let Some(template) = state.draft.response.template_mut() {
                template.push_button(button);
            }
        }
        DraftAction::UpdateButton { index, button } => {
            if let Some(TemplateContent::ButtonTemplate { buttons, .. }) =
                state.draft.response.template_mut()
            {
                if let Some(slot) = buttons.get_mut(index) {
                    *slot = button;
                }
            }
        }
        DraftAction::AddQuickReply(reply) => {
            if let Some(template) = state.draft.response.template_mut() {
                template.push_quick_reply(reply);
            }
        }
        DraftAction::UpdateQuickReply { index, reply } => {
            if let Some(TemplateContent::QuickReplies { replies, .. }) =
                state.draft.response.template_mut()
            {
                if let Some(slot) = replies.get_mut(index) {
                    *slot = reply;
                }
            }
        }
        DraftAction::RemoveButton(index) => {
            if let Some(template) = state.draft.response.template_mut() {
                template.remove_button(index);
            }
        }

        DraftAction::SelectAllPosts => {
            stash_specific_posts(&mut state);
            state.draft.scope.post_selection = PostSelection::All;
        }
        DraftAction::SelectSpecificPosts => {
            if !matches!(
                state.draft.scope.post_selection,
                PostSelection::Specific { .. }
            ) {
                let ids = state.stash.specific_posts.take().unwrap_or_default();
                state.draft.scope.post_selection = PostSelection::Specific { ids };
            }
        }
        DraftAction::TogglePost(id) => {
            if let PostSelection::Specific { ids } = &mut state.draft.scope.post_selection {
                ids.toggle(&id);
            }
        }
        DraftAction::SelectDateRange(window) => {
            stash_specific_posts(&mut state);
            state.draft.scope.post_selection = PostSelection::DateRange { window };
        }

        DraftAction::SetRateLimit(field, value) => {
            let limits = &mut state.draft.rate_limit;
            let slot = match field {
                RateLimitField::MaxActions => &mut limits.max_actions,
                RateLimitField::TimePeriodSeconds => &mut limits.time_period_seconds,
                RateLimitField::UserCooldownSeconds => &mut limits.user_cooldown_seconds,
                RateLimitField::MaxRepliesPerPost => &mut limits.max_replies_per_post,
            };
            *slot = value;
        }
        DraftAction::SetReplyCountCondition(condition) => {
            state.draft.rate_limit.reply_count_condition = condition;
        }
        DraftAction::SetReplyCountValue(value) => state.draft.rate_limit.reply_count_value = value,

        DraftAction::SetModel {
            provider,
            model_name,
        } => {
            state.draft.model.provider = provider;
            state.draft.model.model_name = model_name;
        }
        DraftAction::SetTemperature(value) => state.draft.model.temperature = value,
        DraftAction::SetConfidenceThreshold(value) => {
            state.draft.model.confidence_threshold = value
        }
        DraftAction::SetRagEnabled(value) => state.draft.model.rag_enabled = value,
        DraftAction::SetModelUsage(value) => state.draft.model.model_usage = value,

        DraftAction::SetSchedule(schedule) => state.draft.schedule = schedule,
    }
    state
}

fn switch_trigger(state: &mut EditorState, target: TriggerType) {
    if state.draft.trigger.kind() == target {
        return;
    }
    debug!(from = ?state.draft.trigger.kind(), to = ?target, "switching trigger kind");

    let previous = std::mem::take(&mut state.draft.trigger);
    state.draft.trigger = match previous {
        TriggerSpec::Keyword {
            keywords,
            match_type,
        } => {
            let context = match state.stash.context.take() {
                Some(stored) if !stored.trim().is_empty() => stored,
                _ if !keywords.is_empty() => context_from_keywords(&keywords),
                _ => String::new(),
            };
            if !keywords.is_empty() {
                state.stash.keywords = Some((keywords, match_type));
            }
            TriggerSpec::AiDecision { context }
        }
        TriggerSpec::AiDecision { context } => {
            let (keywords, match_type) = match state.stash.keywords.take() {
                Some((stored, match_type)) if !stored.is_empty() => (stored, match_type),
                _ => (keywords_from_context(&context), MatchType::default()),
            };
            if !context.trim().is_empty() {
                state.stash.context = Some(context);
            }
            TriggerSpec::Keyword {
                keywords,
                match_type,
            }
        }
    };
}

fn switch_response(state: &mut EditorState, target: ResponseKind) {
    if state.draft.response.kind() == target {
        return;
    }
    debug!(from = ?state.draft.response.kind(), to = ?target, "switching response kind");

    let previous = std::mem::take(&mut state.draft.response);
    state.draft.response = match previous {
        ResponseSpec::AiGenerated { system_prompt } => {
            state.stash.system_prompt = Some(system_prompt);
            ResponseSpec::StaticTemplate {
                template: state.stash.template.take().unwrap_or_default(),
            }
        }
        ResponseSpec::StaticTemplate { template } => {
            state.stash.template = Some(template);
            ResponseSpec::AiGenerated {
                system_prompt: state.stash.system_prompt.take().unwrap_or_default(),
            }
        }
    };
}

fn stash_specific_posts(state: &mut EditorState) {
    if let PostSelection::Specific { ids } = &state.draft.scope.post_selection {
        state.stash.specific_posts = Some(ids.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replyline_protocol::types::ReplyCountCondition;

    fn keyword_state(words: &str) -> EditorState {
        EditorState::new()
            .apply(DraftAction::SetName("Pricing".into()))
            .apply(DraftAction::AddKeywords(words.into()))
    }

    #[test]
    fn keyword_to_ai_seeds_context_from_keywords() {
        let state = keyword_state("discount, price").apply(DraftAction::SwitchTrigger(
            TriggerType::AiDecision,
        ));
        assert_eq!(
            state.draft.trigger,
            TriggerSpec::AiDecision {
                context: "Reply when a comment contains keywords like discount, price".into()
            }
        );
    }

    #[test]
    fn keyword_to_ai_without_keywords_leaves_context_empty() {
        let state = EditorState::new().apply(DraftAction::SwitchTrigger(TriggerType::AiDecision));
        assert_eq!(
            state.draft.trigger,
            TriggerSpec::AiDecision {
                context: String::new()
            }
        );
    }

    #[test]
    fn round_trip_without_edits_restores_keywords() {
        let original = keyword_state("discount, price")
            .apply(DraftAction::SetMatchType(MatchType::Exact));
        let expected = original.draft.trigger.clone();

        let restored = original
            .apply(DraftAction::SwitchTrigger(TriggerType::AiDecision))
            .apply(DraftAction::SwitchTrigger(TriggerType::Keyword));
        assert_eq!(restored.draft.trigger, expected);
    }

    #[test]
    fn editing_context_makes_keywords_derive_from_it() {
        let state = keyword_state("discount, price")
            .apply(DraftAction::SwitchTrigger(TriggerType::AiDecision))
            .apply(DraftAction::SetAiContext("Shipping questions from buyers".into()))
            .apply(DraftAction::SwitchTrigger(TriggerType::Keyword));

        match &state.draft.trigger {
            TriggerSpec::Keyword {
                keywords,
                match_type,
            } => {
                assert_eq!(keywords.as_slice(), ["Shipping".to_string()]);
                assert_eq!(*match_type, MatchType::Contains);
            }
            other => panic!("unexpected trigger {other:?}"),
        }
    }

    #[test]
    fn stored_context_survives_a_round_trip() {
        let state = EditorState::new()
            .apply(DraftAction::SwitchTrigger(TriggerType::AiDecision))
            .apply(DraftAction::SetAiContext("Angry customers".into()))
            .apply(DraftAction::SwitchTrigger(TriggerType::Keyword))
            .apply(DraftAction::SwitchTrigger(TriggerType::AiDecision));
        assert_eq!(
            state.draft.trigger,
            TriggerSpec::AiDecision {
                context: "Angry customers".into()
            }
        );
    }

    #[test]
    fn trigger_switch_leaves_other_fields_alone() {
        let before = keyword_state("sale")
            .apply(DraftAction::SelectSpecificPosts)
            .apply(DraftAction::TogglePost("post-1".into()))
            .apply(DraftAction::SetRateLimit(
                RateLimitField::MaxRepliesPerPost,
                Some(4),
            ))
            .apply(DraftAction::SetReplyCountCondition(
                ReplyCountCondition::Equals,
            ))
            .apply(DraftAction::SetTemperature(1.1));
        let after = before
            .clone()
            .apply(DraftAction::SwitchTrigger(TriggerType::AiDecision));

        assert_eq!(after.draft.name, before.draft.name);
        assert_eq!(after.draft.scope, before.draft.scope);
        assert_eq!(after.draft.rate_limit, before.draft.rate_limit);
        assert_eq!(after.draft.model, before.draft.model);
        assert_eq!(after.draft.response, before.draft.response);
    }

    #[test]
    fn response_switch_restores_both_sides() {
        let state = EditorState::new()
            .apply(DraftAction::SetSystemPrompt("Be friendly".into()))
            .apply(DraftAction::SwitchResponse(ResponseKind::StaticTemplate))
            .apply(DraftAction::SetTemplateText("Thanks!".into()))
            .apply(DraftAction::SwitchResponse(ResponseKind::AiGenerated));
        assert_eq!(
            state.draft.response,
            ResponseSpec::AiGenerated {
                system_prompt: "Be friendly".into()
            }
        );

        let state = state.apply(DraftAction::SwitchResponse(ResponseKind::StaticTemplate));
        assert_eq!(
            state.draft.response.template(),
            Some(&TemplateContent::text("Thanks!"))
        );
    }

    #[test]
    fn fourth_button_is_a_no_op() {
        let mut state = EditorState::new()
            .apply(DraftAction::SwitchResponse(ResponseKind::StaticTemplate))
            .apply(DraftAction::SwitchTemplate(TemplateType::ButtonTemplate));
        for index in 0..4 {
            state = state.apply(DraftAction::AddButton(UrlButton::new(
                format!("Link {index}"),
                "https://example.com",
            )));
        }
        assert_eq!(
            state.draft.response.template().map(TemplateContent::button_count),
            Some(3)
        );
    }

    #[test]
    fn specific_posts_come_back_after_switching_scope() {
        let state = EditorState::new()
            .apply(DraftAction::SelectSpecificPosts)
            .apply(DraftAction::TogglePost("a".into()))
            .apply(DraftAction::SelectDateRange(Some(DateWindow::OneWeek)))
            .apply(DraftAction::SelectSpecificPosts);
        match &state.draft.scope.post_selection {
            PostSelection::Specific { ids } => assert!(ids.contains("a")),
            other => panic!("unexpected selection {other:?}"),
        }
    }
}
