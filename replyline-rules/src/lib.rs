//! Rule authoring model for social-media automations.
//!
//! An automation watches comments or DMs for a trigger (keywords or an
//! AI-judged intent) and answers with a response (AI generated or a static
//! template), scoped to a set of posts and throttled by rate limits. This
//! crate owns the editable [`RuleDraft`], the reducer that keeps a draft
//! consistent while its trigger or response kind is switched, the ordered
//! validator, and the serializer that produces the backend wire payloads.

mod deployed;
mod draft;
mod editor;
mod error;
mod loader;
mod model;
mod response;
mod scope;
mod serializer;
mod trigger;
mod validator;

pub use deployed::{DeployedRule, RuleTelemetry};
pub use draft::{RuleDraft, NO_DESCRIPTION};
pub use editor::{reduce, DraftAction, EditorState, RateLimitField};
pub use error::{DraftError, HydrateError, LoadError, SerializeError};
pub use loader::{load_drafts, parse_drafts, DraftDocument};
pub use model::ModelConfig;
pub use response::{QuickReply, ResponseKind, ResponseSpec, TemplateContent, UrlButton};
pub use scope::{PostIdSet, PostSelection, RateLimit, Schedule, ScopeSpec};
pub use serializer::{
    build_submission, check_submission, ensure_supported, hydrate, serialize, template_from_wire,
    template_to_wire, AccountContext,
};
pub use trigger::{KeywordSet, TriggerSpec};
pub use validator::{validate, ValidationError};

pub use replyline_protocol::types::{
    ActivationStatus, AutomationKind, DateWindow, HealthStatus, MatchType, ModelUsage,
    ReplyCountCondition, TemplateType, TriggerType,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_draft_starts_with_a_keyword_trigger_and_no_scope() {
        let draft = RuleDraft::default();
        assert_eq!(draft.trigger.kind(), TriggerType::Keyword);
        assert_eq!(draft.scope.post_selection, PostSelection::All);
        assert!(draft.id.is_none());
    }
}
