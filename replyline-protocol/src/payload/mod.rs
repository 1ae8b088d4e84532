mod comment;
mod comment_dm;
mod dm;
mod template;

pub use comment::CommentReplyPayload;
pub use comment_dm::CommentToDmPayload;
pub use dm::DmKeywordPayload;
pub use template::{
    Attachment, ButtonPayload, ButtonType, ImagePayload, QuickReplyContentType, QuickReplyWire,
    ReplyTemplateContent, TemplateMessage, UrlButtonWire,
};

use serde::Serialize;

use crate::types::AutomationKind;

/// Submission body for any automation kind.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum SubmitPayload {
    CommentReply(CommentReplyPayload),
    DmKeywordReply(DmKeywordPayload),
    CommentToDm(CommentToDmPayload),
}

impl SubmitPayload {
    pub fn kind(&self) -> AutomationKind {
        match self {
            SubmitPayload::CommentReply(_) => AutomationKind::CommentReply,
            SubmitPayload::DmKeywordReply(_) => AutomationKind::DmKeywordReply,
            SubmitPayload::CommentToDm(_) => AutomationKind::CommentToDm,
        }
    }

    pub fn automation_id(&self) -> Option<&str> {
        match self {
            SubmitPayload::CommentReply(payload) => payload.automation_id.as_deref(),
            SubmitPayload::DmKeywordReply(payload) => payload.automation_id.as_deref(),
            SubmitPayload::CommentToDm(payload) => payload.automation_id.as_deref(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SubmitPayload::CommentReply(payload) => &payload.name,
            SubmitPayload::DmKeywordReply(payload) => &payload.name,
            SubmitPayload::CommentToDm(payload) => &payload.name,
        }
    }
}
