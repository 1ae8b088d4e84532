//! Ordered precondition checks run before a draft is submitted.
//!
//! Checks run in a fixed order and evaluation stops at the first failure, so
//! a caller only ever has one message to show.

use thiserror::Error;

use crate::draft::RuleDraft;
use crate::model::ModelConfig;
use crate::response::{ResponseSpec, TemplateContent};
use crate::scope::{PostSelection, Schedule};
use crate::trigger::TriggerSpec;

/// First check a draft failed. `Display` is the message shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a name for the automation.")]
    MissingName,
    #[error("Please add at least one keyword.")]
    MissingKeywords,
    #[error("Please provide a context for the AI.")]
    MissingAiContext,
    #[error("Please select at least one post.")]
    MissingPosts,
    #[error("Please select a date range.")]
    MissingDateRange,
    #[error("Max replies per post cannot be negative.")]
    NegativeMaxRepliesPerPost,
    #[error("Reply count value cannot be negative.")]
    NegativeReplyCountValue,
    #[error("Please enter a message for the reply.")]
    MissingMessage,
    #[error("Max actions cannot be negative.")]
    NegativeMaxActions,
    #[error("Time period cannot be negative.")]
    NegativeTimePeriod,
    #[error("User cooldown cannot be negative.")]
    NegativeUserCooldown,
    #[error("Temperature must be between 0 and 2.")]
    TemperatureOutOfRange,
    #[error("Confidence threshold must be between 0 and 1.")]
    ConfidenceOutOfRange,
    #[error("Every button needs a title and a link.")]
    IncompleteButton,
    #[error("Every quick reply needs a title and a payload.")]
    IncompleteQuickReply,
    #[error("Please enter a delay for the scheduled message.")]
    MissingDelay,
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

type Check = fn(&RuleDraft) -> Result<(), ValidationError>;

const CHECKS: &[Check] = &[
    check_name,
    check_keywords,
    check_ai_context,
    check_specific_posts,
    check_date_range,
    check_max_replies_per_post,
    check_reply_count_value,
    check_message,
    check_max_actions,
    check_time_period,
    check_user_cooldown,
    check_temperature,
    check_confidence,
    check_template_buttons,
    check_schedule,
];

/// Runs every check in order and returns the first failure.
pub fn validate(draft: &RuleDraft) -> Result<(), ValidationError> {
    CHECKS.iter().try_for_each(|check| check(draft))
}

fn ensure(condition: bool, error: ValidationError) -> Result<(), ValidationError> {
    if condition {
        Ok(())
    } else {
        Err(error)
    }
}

fn non_negative(value: Option<i64>) -> bool {
    value.map_or(true, |value| value >= 0)
}

fn check_name(draft: &RuleDraft) -> Result<(), ValidationError> {
    ensure(!draft.name.trim().is_empty(), ValidationError::MissingName)
}

fn check_keywords(draft: &RuleDraft) -> Result<(), ValidationError> {
    match &draft.trigger {
        TriggerSpec::Keyword { keywords, .. } => {
            ensure(!keywords.is_empty(), ValidationError::MissingKeywords)
        }
        TriggerSpec::AiDecision { .. } => Ok(()),
    }
}

fn check_ai_context(draft: &RuleDraft) -> Result<(), ValidationError> {
    match &draft.trigger {
        TriggerSpec::AiDecision { context } => {
            ensure(!context.trim().is_empty(), ValidationError::MissingAiContext)
        }
        TriggerSpec::Keyword { .. } => Ok(()),
    }
}

fn check_specific_posts(draft: &RuleDraft) -> Result<(), ValidationError> {
    match &draft.scope.post_selection {
        PostSelection::Specific { ids } => ensure(
            ids.as_slice().iter().any(|id| !id.trim().is_empty()),
            ValidationError::MissingPosts,
        ),
        _ => Ok(()),
    }
}

fn check_date_range(draft: &RuleDraft) -> Result<(), ValidationError> {
    match &draft.scope.post_selection {
        PostSelection::DateRange { window } => {
            ensure(window.is_some(), ValidationError::MissingDateRange)
        }
        _ => Ok(()),
    }
}

fn check_max_replies_per_post(draft: &RuleDraft) -> Result<(), ValidationError> {
    ensure(
        non_negative(draft.rate_limit.max_replies_per_post),
        ValidationError::NegativeMaxRepliesPerPost,
    )
}

fn check_reply_count_value(draft: &RuleDraft) -> Result<(), ValidationError> {
    ensure(
        draft.rate_limit.reply_count_value >= 0,
        ValidationError::NegativeReplyCountValue,
    )
}

fn check_message(draft: &RuleDraft) -> Result<(), ValidationError> {
    match &draft.response {
        ResponseSpec::StaticTemplate { template } => {
            ensure(!template.is_blank(), ValidationError::MissingMessage)
        }
        ResponseSpec::AiGenerated { .. } => Ok(()),
    }
}

fn check_max_actions(draft: &RuleDraft) -> Result<(), ValidationError> {
    ensure(
        non_negative(draft.rate_limit.max_actions),
        ValidationError::NegativeMaxActions,
    )
}

fn check_time_period(draft: &RuleDraft) -> Result<(), ValidationError> {
    ensure(
        non_negative(draft.rate_limit.time_period_seconds),
        ValidationError::NegativeTimePeriod,
    )
}

fn check_user_cooldown(draft: &RuleDraft) -> Result<(), ValidationError> {
    ensure(
        non_negative(draft.rate_limit.user_cooldown_seconds),
        ValidationError::NegativeUserCooldown,
    )
}

fn check_temperature(draft: &RuleDraft) -> Result<(), ValidationError> {
    let (low, high) = ModelConfig::TEMPERATURE_RANGE;
    let value = draft.model.temperature;
    ensure(
        (low..=high).contains(&value),
        ValidationError::TemperatureOutOfRange,
    )
}

fn check_confidence(draft: &RuleDraft) -> Result<(), ValidationError> {
    let (low, high) = ModelConfig::CONFIDENCE_RANGE;
    let value = draft.model.confidence_threshold;
    ensure(
        (low..=high).contains(&value),
        ValidationError::ConfidenceOutOfRange,
    )
}

fn check_template_buttons(draft: &RuleDraft) -> Result<(), ValidationError> {
    match draft.response.template() {
        Some(TemplateContent::ButtonTemplate { buttons, .. }) => ensure(
            buttons
                .iter()
                .all(|button| !button.text.trim().is_empty() && !button.link.trim().is_empty()),
            ValidationError::IncompleteButton,
        ),
        Some(TemplateContent::QuickReplies { replies, .. }) => ensure(
            replies
                .iter()
                .all(|reply| !reply.text.trim().is_empty() && !reply.payload.trim().is_empty()),
            ValidationError::IncompleteQuickReply,
        ),
        _ => Ok(()),
    }
}

fn check_schedule(draft: &RuleDraft) -> Result<(), ValidationError> {
    match draft.schedule {
        Schedule::Delayed { delay_seconds } => {
            ensure(delay_seconds > 0, ValidationError::MissingDelay)
        }
        Schedule::Immediate => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::UrlButton;
    use crate::scope::PostIdSet;
    use crate::trigger::KeywordSet;
    use replyline_protocol::types::{DateWindow, MatchType};
    use test_case::test_case;

    fn valid_draft() -> RuleDraft {
        RuleDraft {
            name: "Pricing".into(),
            trigger: TriggerSpec::Keyword {
                keywords: KeywordSet::from_iter(["discount", "price"]),
                match_type: MatchType::Contains,
            },
            ..RuleDraft::default()
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(validate(&valid_draft()), Ok(()));
    }

    #[test]
    fn empty_keywords_report_only_the_keyword_error() {
        let mut draft = valid_draft();
        draft.trigger = TriggerSpec::default();
        // Later checks would also fail; only the keyword message surfaces.
        draft.rate_limit.max_replies_per_post = Some(-1);
        draft.response = ResponseSpec::StaticTemplate {
            template: TemplateContent::text(""),
        };
        assert_eq!(validate(&draft), Err(ValidationError::MissingKeywords));
    }

    #[test]
    fn empty_ai_context_has_exact_message() {
        let mut draft = valid_draft();
        draft.trigger = TriggerSpec::AiDecision {
            context: String::new(),
        };
        let err = validate(&draft).expect_err("empty context must fail");
        assert_eq!(err.to_string(), "Please provide a context for the AI.");
    }

    #[test]
    fn name_is_checked_first() {
        let mut draft = valid_draft();
        draft.name = "   ".into();
        draft.trigger = TriggerSpec::default();
        assert_eq!(validate(&draft), Err(ValidationError::MissingName));
    }

    #[test]
    fn empty_specific_selection_fails_even_when_everything_else_is_valid() {
        let mut draft = valid_draft();
        draft.scope.post_selection = PostSelection::Specific {
            ids: PostIdSet::new(),
        };
        assert_eq!(validate(&draft), Err(ValidationError::MissingPosts));
    }

    #[test]
    fn date_range_requires_a_window() {
        let mut draft = valid_draft();
        draft.scope.post_selection = PostSelection::DateRange { window: None };
        assert_eq!(validate(&draft), Err(ValidationError::MissingDateRange));
        draft.scope.post_selection = PostSelection::DateRange {
            window: Some(DateWindow::TwoWeeks),
        };
        assert_eq!(validate(&draft), Ok(()));
    }

    #[test_case(None, Ok(()) ; "unlimited")]
    #[test_case(Some(0), Ok(()) ; "zero")]
    #[test_case(Some(5), Ok(()) ; "positive")]
    #[test_case(Some(-1), Err(ValidationError::NegativeMaxRepliesPerPost) ; "negative")]
    fn max_replies_per_post(value: Option<i64>, expected: Result<(), ValidationError>) {
        let mut draft = valid_draft();
        draft.rate_limit.max_replies_per_post = value;
        assert_eq!(validate(&draft), expected);
    }

    #[test_case(-0.1, Err(ValidationError::TemperatureOutOfRange) ; "below range")]
    #[test_case(0.0, Ok(()) ; "lower bound")]
    #[test_case(2.0, Ok(()) ; "upper bound")]
    #[test_case(2.5, Err(ValidationError::TemperatureOutOfRange) ; "above range")]
    fn temperature_bounds(value: f64, expected: Result<(), ValidationError>) {
        let mut draft = valid_draft();
        draft.model.temperature = value;
        assert_eq!(validate(&draft), expected);
    }

    #[test]
    fn negative_reply_count_value_is_rejected() {
        let mut draft = valid_draft();
        draft.rate_limit.reply_count_value = -2;
        assert_eq!(validate(&draft), Err(ValidationError::NegativeReplyCountValue));
    }

    #[test]
    fn blank_static_message_is_rejected() {
        let mut draft = valid_draft();
        draft.response = ResponseSpec::StaticTemplate {
            template: TemplateContent::text("  "),
        };
        assert_eq!(validate(&draft), Err(ValidationError::MissingMessage));
    }

    #[test]
    fn negative_cooldown_is_rejected() {
        let mut draft = valid_draft();
        draft.rate_limit.user_cooldown_seconds = Some(-30);
        assert_eq!(validate(&draft), Err(ValidationError::NegativeUserCooldown));
    }

    #[test]
    fn button_without_link_is_rejected() {
        let mut draft = valid_draft();
        draft.response = ResponseSpec::StaticTemplate {
            template: TemplateContent::ButtonTemplate {
                text: "Shop now".into(),
                buttons: vec![UrlButton::new("Store", "")],
            },
        };
        assert_eq!(validate(&draft), Err(ValidationError::IncompleteButton));
    }

    #[test]
    fn delayed_schedule_needs_a_delay() {
        let mut draft = valid_draft();
        draft.schedule = Schedule::Delayed { delay_seconds: 0 };
        assert_eq!(validate(&draft), Err(ValidationError::MissingDelay));
    }
}
