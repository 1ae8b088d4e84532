use replyline_protocol::types::{AutomationKind, TemplateType};
use serde::{Deserialize, Serialize};

use crate::model::ModelConfig;
use crate::response::ResponseSpec;
use crate::scope::{PostSelection, RateLimit, Schedule, ScopeSpec};
use crate::trigger::TriggerSpec;

/// Sent in place of an empty description. Reserved: a draft whose
/// description is exactly this text reads back as empty.
pub const NO_DESCRIPTION: &str = "No description";

/// Editable automation configuration owned by one editor session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RuleDraft {
    /// Present only when editing an automation that is already deployed.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub trigger: TriggerSpec,
    #[serde(default)]
    pub response: ResponseSpec,
    #[serde(default)]
    pub scope: ScopeSpec,
    #[serde(default)]
    pub rate_limit: RateLimit,
    #[serde(default)]
    pub model: ModelConfig,
    /// Only meaningful for comment-to-DM automations.
    #[serde(default)]
    pub schedule: Schedule,
}

impl RuleDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Description as sent on the wire.
    pub fn description_or_default(&self) -> &str {
        let trimmed = self.description.trim();
        if trimmed.is_empty() {
            NO_DESCRIPTION
        } else {
            &self.description
        }
    }

    /// Description as it reads back from the backend: blank text and the
    /// sentinel both come back empty.
    pub fn stored_description(&self) -> &str {
        match self.description_or_default() {
            NO_DESCRIPTION => "",
            text => text,
        }
    }

    /// Re-applies the caps and blank-text rules after loading from an
    /// outside source.
    pub fn normalize(&mut self) {
        if self.description.trim().is_empty() {
            self.description.clear();
        }
        if let Some(template) = self.response.template_mut() {
            template.truncate_to_cap();
        }
    }

    /// The draft reduced to the fields `kind` carries on the wire.
    ///
    /// Serializing and reading back a draft yields exactly its projection,
    /// minus the id.
    pub fn project(&self, kind: AutomationKind) -> RuleDraft {
        let mut projected = self.clone();
        projected.description = self.stored_description().to_string();
        match kind {
            AutomationKind::CommentReply => {
                projected.schedule = Schedule::Immediate;
            }
            AutomationKind::CommentToDm => {
                projected.rate_limit = RateLimit {
                    max_actions: self.rate_limit.max_actions,
                    time_period_seconds: self.rate_limit.time_period_seconds,
                    user_cooldown_seconds: self.rate_limit.user_cooldown_seconds,
                    ..RateLimit::default()
                };
            }
            AutomationKind::DmKeywordReply => {
                projected.scope.post_selection = PostSelection::All;
                projected.schedule = Schedule::Immediate;
                projected.rate_limit = RateLimit {
                    user_cooldown_seconds: self.rate_limit.user_cooldown_seconds,
                    ..RateLimit::default()
                };
                projected.model = ModelConfig {
                    model_usage: self.model.model_usage,
                    ..ModelConfig::default()
                };
            }
        }
        projected
    }

    /// Template type of a static response, if any.
    pub fn template_type(&self) -> Option<TemplateType> {
        self.response.template().map(|template| template.template_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_description_uses_sentinel() {
        let mut draft = RuleDraft::named("Pricing");
        assert_eq!(draft.description_or_default(), NO_DESCRIPTION);
        draft.description = "  ".into();
        assert_eq!(draft.description_or_default(), NO_DESCRIPTION);
        draft.description = "Answers price questions".into();
        assert_eq!(draft.description_or_default(), "Answers price questions");
    }

    #[test]
    fn blank_description_projects_and_normalizes_to_empty() {
        let mut draft = RuleDraft::named("Pricing");
        draft.description = "   ".into();
        assert_eq!(draft.project(AutomationKind::CommentReply).description, "");

        draft.normalize();
        assert_eq!(draft.description, "");

        draft.description = " Keeps its spacing ".into();
        assert_eq!(
            draft.project(AutomationKind::CommentToDm).description,
            " Keeps its spacing "
        );
    }

    #[test]
    fn dm_projection_drops_post_level_fields() {
        let mut draft = RuleDraft::named("DMs");
        draft.rate_limit.max_replies_per_post = Some(2);
        draft.rate_limit.user_cooldown_seconds = Some(60);
        let projected = draft.project(AutomationKind::DmKeywordReply);
        assert_eq!(projected.rate_limit.max_replies_per_post, None);
        assert_eq!(projected.rate_limit.user_cooldown_seconds, Some(60));
    }
}
